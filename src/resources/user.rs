//! Users, passwords, group membership, and realm role mappings.

// self
use crate::{
	_prelude::*,
	client::{KeycloakClient, escape},
	resources::{CredentialRepresentation, GroupRepresentation, RoleRepresentation, realm_path},
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// User representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Login name; the server lowercases it.
	pub username: String,
	/// Whether the user may log in.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// E-mail address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Whether the e-mail address is verified.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email_verified: Option<bool>,
	/// Given name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Multi-valued attributes.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, Vec<String>>,
	/// Actions forced on next login, e.g. `UPDATE_PASSWORD`.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub required_actions: Vec<String>,
	/// ID of the user storage component the user was imported from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub federation_link: Option<String>,
	/// Creation time in epoch milliseconds.
	#[serde(default, skip_serializing)]
	pub created_timestamp: Option<i64>,
	/// Initial credentials; accepted on create only.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub credentials: Vec<CredentialRepresentation>,
}
impl UserRepresentation {
	/// Creates an enabled user called `username`.
	pub fn new(username: impl Into<String>) -> Self {
		Self { username: username.into(), enabled: Some(true), ..Default::default() }
	}
}

impl KeycloakClient {
	/// Creates a user and returns its ID.
	pub async fn create_user(&self, realm: &str, user: &UserRepresentation) -> Result<String> {
		self.post(&users_path(realm), user).await
	}

	/// Reads a user by ID.
	pub async fn get_user(&self, realm: &str, id: &str) -> Result<UserRepresentation> {
		self.get(&user_path(realm, id)).await
	}

	/// Finds a user by exact username.
	///
	/// The search endpoint matches case-insensitively, so the result is filtered again locally.
	pub async fn find_user_by_username(
		&self,
		realm: &str,
		username: &str,
	) -> Result<Option<UserRepresentation>> {
		let users: Vec<UserRepresentation> = self
			.get_query(&users_path(realm), &[("username", username), ("exact", "true")])
			.await?;

		Ok(users.into_iter().find(|user| user.username.eq_ignore_ascii_case(username)))
	}

	/// Replaces user `id`.
	pub async fn update_user(
		&self,
		realm: &str,
		id: &str,
		user: &UserRepresentation,
	) -> Result<()> {
		self.put(&user_path(realm, id), user).await
	}

	/// Deletes user `id`.
	pub async fn delete_user(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&user_path(realm, id)).await
	}

	/// Sets the password of user `id`.
	pub async fn reset_user_password(
		&self,
		realm: &str,
		id: &str,
		password: &str,
		temporary: bool,
	) -> Result<()> {
		let credential = CredentialRepresentation::password(password, temporary);

		self.put(&format!("{}/reset-password", user_path(realm, id)), &credential).await
	}

	/// Lists the groups user `id` belongs to.
	pub async fn list_user_groups(
		&self,
		realm: &str,
		id: &str,
	) -> Result<Vec<GroupRepresentation>> {
		self.get(&format!("{}/groups", user_path(realm, id))).await
	}

	/// Adds user `id` to group `group_id`.
	pub async fn add_user_to_group(&self, realm: &str, id: &str, group_id: &str) -> Result<()> {
		self.put_unit(&membership_path(realm, id, group_id)).await
	}

	/// Removes user `id` from group `group_id`.
	pub async fn remove_user_from_group(
		&self,
		realm: &str,
		id: &str,
		group_id: &str,
	) -> Result<()> {
		self.delete(&membership_path(realm, id, group_id)).await
	}

	/// Lists the realm roles mapped directly to user `id`.
	pub async fn list_user_realm_roles(
		&self,
		realm: &str,
		id: &str,
	) -> Result<Vec<RoleRepresentation>> {
		self.get(&realm_mappings_path(realm, id)).await
	}

	/// Maps realm `roles` to user `id`.
	pub async fn add_user_realm_roles(
		&self,
		realm: &str,
		id: &str,
		roles: &[RoleRepresentation],
	) -> Result<()> {
		self.post_unit(&realm_mappings_path(realm, id), roles).await
	}

	/// Unmaps realm `roles` from user `id`.
	pub async fn remove_user_realm_roles(
		&self,
		realm: &str,
		id: &str,
		roles: &[RoleRepresentation],
	) -> Result<()> {
		self.delete_with_body(&realm_mappings_path(realm, id), roles).await
	}
}

fn users_path(realm: &str) -> String {
	format!("{}/users", realm_path(realm))
}

fn user_path(realm: &str, id: &str) -> String {
	format!("{}/users/{}", realm_path(realm), escape(id))
}

fn membership_path(realm: &str, id: &str, group_id: &str) -> String {
	format!("{}/groups/{}", user_path(realm, id), escape(group_id))
}

fn realm_mappings_path(realm: &str, id: &str) -> String {
	format!("{}/role-mappings/realm", user_path(realm, id))
}

/// Schema of `keycloak_user`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_user")
		.description("Manages a user of a realm.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Server-assigned user ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required("username", AttributeKind::String, "Login name."))
		.attribute(
			Attribute::optional("enabled", AttributeKind::Bool, "Whether the user may log in.")
				.default_value("true"),
		)
		.attribute(Attribute::optional("email", AttributeKind::String, "E-mail address."))
		.attribute(
			Attribute::optional(
				"email_verified",
				AttributeKind::Bool,
				"Whether the e-mail address is verified.",
			)
			.default_value("false"),
		)
		.attribute(Attribute::optional("first_name", AttributeKind::String, "Given name."))
		.attribute(Attribute::optional("last_name", AttributeKind::String, "Family name."))
		.attribute(Attribute::optional("attributes", AttributeKind::Map, "Free-form attributes."))
		.attribute(Attribute::optional(
			"required_actions",
			AttributeKind::Set,
			"Actions forced on next login.",
		))
		.attribute(
			Attribute::optional(
				"initial_password",
				AttributeKind::String,
				"Password set once on create; later changes are ignored.",
			)
			.sensitive(),
		)
		.attribute(Attribute::computed(
			"federation_link",
			AttributeKind::String,
			"ID of the user storage the user was imported from.",
		))
		.import(ImportFormat::new(&["realm_id", "id"]))
		.build()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn membership_is_addressed_by_group_segment() {
		assert_eq!(membership_path("test", "u-1", "g-1"), "/realms/test/users/u-1/groups/g-1");
		assert_eq!(
			realm_mappings_path("test", "u-1"),
			"/realms/test/users/u-1/role-mappings/realm"
		);
	}

	#[test]
	fn creation_timestamp_is_read_only() {
		let user: UserRepresentation = serde_json::from_value(serde_json::json!({
			"id": "u-1",
			"username": "alice",
			"enabled": true,
			"createdTimestamp": 1_700_000_000_000_i64,
			"requiredActions": ["VERIFY_EMAIL"]
		}))
		.expect("User should decode.");

		assert_eq!(user.created_timestamp, Some(1_700_000_000_000));

		let encoded = serde_json::to_value(&user).expect("User should encode.");

		assert!(encoded.get("createdTimestamp").is_none());
		assert_eq!(encoded["requiredActions"], serde_json::json!(["VERIFY_EMAIL"]));
		assert!(encoded.get("credentials").is_none());
	}
}
