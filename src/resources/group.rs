//! Groups, their members, role mappings, and the realm's default groups.

// self
use crate::{
	_prelude::*,
	client::{KeycloakClient, escape},
	resources::{RoleRepresentation, UserRepresentation, realm_path},
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// Group representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Group name, unique among siblings.
	pub name: String,
	/// Full path such as `/parent/child`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	/// Parent group ID; reported by newer servers only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
	/// Multi-valued attributes.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, Vec<String>>,
	/// Child groups; returned on reads only.
	#[serde(default, skip_serializing)]
	pub sub_groups: Vec<GroupRepresentation>,
}
impl GroupRepresentation {
	/// Creates a group called `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), ..Default::default() }
	}
}

impl KeycloakClient {
	/// Creates a top-level group, or a child of `parent`, and returns its ID.
	pub async fn create_group(
		&self,
		realm: &str,
		parent: Option<&str>,
		group: &GroupRepresentation,
	) -> Result<String> {
		let path = match parent {
			Some(parent) => format!("{}/children", group_path(realm, parent)),
			None => groups_path(realm),
		};

		self.post(&path, group).await
	}

	/// Reads a group by ID.
	pub async fn get_group(&self, realm: &str, id: &str) -> Result<GroupRepresentation> {
		self.get(&group_path(realm, id)).await
	}

	/// Lists the top-level groups of the realm.
	pub async fn list_groups(&self, realm: &str) -> Result<Vec<GroupRepresentation>> {
		self.get(&groups_path(realm)).await
	}

	/// Replaces group `id`.
	pub async fn update_group(
		&self,
		realm: &str,
		id: &str,
		group: &GroupRepresentation,
	) -> Result<()> {
		self.put(&group_path(realm, id), group).await
	}

	/// Deletes group `id`; the call is repeated once on failure.
	pub async fn delete_group(&self, realm: &str, id: &str) -> Result<()> {
		self.delete_retrying_once(&group_path(realm, id)).await
	}

	/// Lists the direct members of group `id`.
	pub async fn list_group_members(
		&self,
		realm: &str,
		id: &str,
	) -> Result<Vec<UserRepresentation>> {
		self.get(&format!("{}/members", group_path(realm, id))).await
	}

	/// Lists the realm roles mapped to group `id`.
	pub async fn list_group_realm_roles(
		&self,
		realm: &str,
		id: &str,
	) -> Result<Vec<RoleRepresentation>> {
		self.get(&realm_mappings_path(realm, id)).await
	}

	/// Maps realm `roles` to group `id`.
	pub async fn add_group_realm_roles(
		&self,
		realm: &str,
		id: &str,
		roles: &[RoleRepresentation],
	) -> Result<()> {
		self.post_unit(&realm_mappings_path(realm, id), roles).await
	}

	/// Unmaps realm `roles` from group `id`.
	pub async fn remove_group_realm_roles(
		&self,
		realm: &str,
		id: &str,
		roles: &[RoleRepresentation],
	) -> Result<()> {
		self.delete_with_body(&realm_mappings_path(realm, id), roles).await
	}

	/// Lists the roles of client `client` mapped to group `id`.
	pub async fn list_group_client_roles(
		&self,
		realm: &str,
		id: &str,
		client: &str,
	) -> Result<Vec<RoleRepresentation>> {
		self.get(&client_mappings_path(realm, id, client)).await
	}

	/// Maps roles of client `client` to group `id`.
	pub async fn add_group_client_roles(
		&self,
		realm: &str,
		id: &str,
		client: &str,
		roles: &[RoleRepresentation],
	) -> Result<()> {
		self.post_unit(&client_mappings_path(realm, id, client), roles).await
	}

	/// Unmaps roles of client `client` from group `id`.
	pub async fn remove_group_client_roles(
		&self,
		realm: &str,
		id: &str,
		client: &str,
		roles: &[RoleRepresentation],
	) -> Result<()> {
		self.delete_with_body(&client_mappings_path(realm, id, client), roles).await
	}

	/// Lists the groups new users join automatically.
	pub async fn list_default_groups(&self, realm: &str) -> Result<Vec<GroupRepresentation>> {
		self.get(&format!("{}/default-groups", realm_path(realm))).await
	}

	/// Makes group `id` a default group.
	pub async fn add_default_group(&self, realm: &str, id: &str) -> Result<()> {
		self.put_unit(&default_group_path(realm, id)).await
	}

	/// Stops group `id` from being a default group.
	pub async fn remove_default_group(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&default_group_path(realm, id)).await
	}
}

fn groups_path(realm: &str) -> String {
	format!("{}/groups", realm_path(realm))
}

pub(crate) fn group_path(realm: &str, id: &str) -> String {
	format!("{}/groups/{}", realm_path(realm), escape(id))
}

fn realm_mappings_path(realm: &str, id: &str) -> String {
	format!("{}/role-mappings/realm", group_path(realm, id))
}

fn client_mappings_path(realm: &str, id: &str, client: &str) -> String {
	format!("{}/role-mappings/clients/{}", group_path(realm, id), escape(client))
}

fn default_group_path(realm: &str, id: &str) -> String {
	format!("{}/default-groups/{}", realm_path(realm), escape(id))
}

/// Schema of `keycloak_group`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_group")
		.description("Manages a group; groups nest through `parent_id`.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Server-assigned group ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::optional(
			"parent_id",
			AttributeKind::String,
			"ID of the parent group; unset for top-level groups.",
		))
		.attribute(Attribute::required("name", AttributeKind::String, "Group name."))
		.attribute(Attribute::computed("path", AttributeKind::String, "Full group path."))
		.attribute(Attribute::optional("attributes", AttributeKind::Map, "Free-form attributes."))
		.import(ImportFormat::new(&["realm_id", "id"]))
		.build()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn mapping_paths_nest_under_the_group() {
		assert_eq!(
			realm_mappings_path("test", "g-1"),
			"/realms/test/groups/g-1/role-mappings/realm"
		);
		assert_eq!(
			client_mappings_path("test", "g-1", "c-1"),
			"/realms/test/groups/g-1/role-mappings/clients/c-1"
		);
		assert_eq!(default_group_path("test", "g-1"), "/realms/test/default-groups/g-1");
	}

	#[test]
	fn sub_groups_decode_recursively() {
		let group: GroupRepresentation = serde_json::from_value(serde_json::json!({
			"id": "g-1",
			"name": "parent",
			"path": "/parent",
			"subGroups": [{ "id": "g-2", "name": "child", "path": "/parent/child" }]
		}))
		.expect("Group should decode.");

		assert_eq!(group.sub_groups[0].path.as_deref(), Some("/parent/child"));
		assert_eq!(
			serde_json::to_value(&group).expect("Group should encode.")["subGroups"],
			serde_json::Value::Null
		);
	}
}
