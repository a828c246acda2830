//! Realm roles, client roles, and composites.
//!
//! The `Location` header of a role create names the role rather than its ID, so creates post
//! the role and then read it back by name.

// self
use crate::{
	_prelude::*,
	client::{KeycloakClient, escape},
	resources::{client::client_path, realm_path},
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// Role representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Role name, unique within its container.
	pub name: String,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Whether the role has composites.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub composite: Option<bool>,
	/// Whether the role belongs to a client.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_role: Option<bool>,
	/// Realm ID or client ID owning the role.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub container_id: Option<String>,
	/// Multi-valued attributes.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, Vec<String>>,
}
impl RoleRepresentation {
	/// Creates a role called `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), ..Default::default() }
	}
}

/// Owner of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleContainer<'a> {
	/// Realm-level role.
	Realm,
	/// Role of the client with this server-assigned ID.
	Client(&'a str),
}

impl KeycloakClient {
	/// Creates a role and reads it back to learn its ID.
	pub async fn create_role(
		&self,
		realm: &str,
		container: RoleContainer<'_>,
		role: &RoleRepresentation,
	) -> Result<RoleRepresentation> {
		self.post_unit(&roles_path(realm, container), role).await?;
		self.get_role_by_name(realm, container, &role.name).await
	}

	/// Reads a role by name.
	pub async fn get_role_by_name(
		&self,
		realm: &str,
		container: RoleContainer<'_>,
		name: &str,
	) -> Result<RoleRepresentation> {
		self.get(&format!("{}/{}", roles_path(realm, container), escape(name))).await
	}

	/// Lists the roles of a container.
	pub async fn list_roles(
		&self,
		realm: &str,
		container: RoleContainer<'_>,
	) -> Result<Vec<RoleRepresentation>> {
		self.get(&roles_path(realm, container)).await
	}

	/// Reads a role by ID.
	pub async fn get_role(&self, realm: &str, id: &str) -> Result<RoleRepresentation> {
		self.get(&role_by_id_path(realm, id)).await
	}

	/// Replaces role `id`.
	pub async fn update_role(
		&self,
		realm: &str,
		id: &str,
		role: &RoleRepresentation,
	) -> Result<()> {
		self.put(&role_by_id_path(realm, id), role).await
	}

	/// Deletes role `id`.
	pub async fn delete_role(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&role_by_id_path(realm, id)).await
	}

	/// Lists the composites of role `id`.
	pub async fn list_composites(&self, realm: &str, id: &str) -> Result<Vec<RoleRepresentation>> {
		self.get(&composites_path(realm, id)).await
	}

	/// Adds `composites` to role `id`.
	pub async fn add_composites(
		&self,
		realm: &str,
		id: &str,
		composites: &[RoleRepresentation],
	) -> Result<()> {
		self.post_unit(&composites_path(realm, id), composites).await
	}

	/// Removes `composites` from role `id`.
	pub async fn remove_composites(
		&self,
		realm: &str,
		id: &str,
		composites: &[RoleRepresentation],
	) -> Result<()> {
		self.delete_with_body(&composites_path(realm, id), composites).await
	}
}

fn roles_path(realm: &str, container: RoleContainer<'_>) -> String {
	match container {
		RoleContainer::Realm => format!("{}/roles", realm_path(realm)),
		RoleContainer::Client(client_id) => format!("{}/roles", client_path(realm, client_id)),
	}
}

fn role_by_id_path(realm: &str, id: &str) -> String {
	format!("{}/roles-by-id/{}", realm_path(realm), escape(id))
}

fn composites_path(realm: &str, id: &str) -> String {
	format!("{}/composites", role_by_id_path(realm, id))
}

/// Schema of `keycloak_role`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_role")
		.description("Manages a realm role or, when `client_id` is set, a client role.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Server-assigned role ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::optional(
			"client_id",
			AttributeKind::String,
			"Server-assigned ID of the owning client; unset for realm roles.",
		))
		.attribute(Attribute::required("name", AttributeKind::String, "Role name."))
		.attribute(Attribute::optional("description", AttributeKind::String, "Description."))
		.attribute(Attribute::optional(
			"composite_roles",
			AttributeKind::Set,
			"IDs of the roles this role is composed of.",
		))
		.attribute(Attribute::optional("attributes", AttributeKind::Map, "Free-form attributes."))
		.import(ImportFormat::new(&["realm_id", "id"]))
		.build()
}
