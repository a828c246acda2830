//! Protocol mappers attached to clients or client scopes.

// self
use crate::{
	_prelude::*,
	client::{KeycloakClient, escape},
	resources::{client::client_path, client_scope::scope_path},
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// Protocol mapper representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMapperRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Mapper name, unique within its parent.
	pub name: String,
	/// `openid-connect` or `saml`.
	pub protocol: String,
	/// Mapper implementation, e.g. `oidc-hardcoded-claim-mapper`.
	pub protocol_mapper: String,
	/// Mapper settings such as `claim.name` and `access.token.claim`.
	#[serde(default)]
	pub config: BTreeMap<String, String>,
}
impl ProtocolMapperRepresentation {
	/// Creates an OpenID Connect mapper of type `protocol_mapper`.
	pub fn openid(name: impl Into<String>, protocol_mapper: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			protocol: "openid-connect".into(),
			protocol_mapper: protocol_mapper.into(),
			..Default::default()
		}
	}
}

/// Owner of a protocol mapper, by server-assigned ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolMapperParent<'a> {
	/// Mapper of a client.
	Client(&'a str),
	/// Mapper of a client scope.
	ClientScope(&'a str),
}

impl KeycloakClient {
	/// Creates a protocol mapper and returns its ID.
	pub async fn create_protocol_mapper(
		&self,
		realm: &str,
		parent: ProtocolMapperParent<'_>,
		mapper: &ProtocolMapperRepresentation,
	) -> Result<String> {
		self.post(&models_path(realm, parent), mapper).await
	}

	/// Reads protocol mapper `id`.
	pub async fn get_protocol_mapper(
		&self,
		realm: &str,
		parent: ProtocolMapperParent<'_>,
		id: &str,
	) -> Result<ProtocolMapperRepresentation> {
		self.get(&model_path(realm, parent, id)).await
	}

	/// Lists the protocol mappers of `parent`.
	pub async fn list_protocol_mappers(
		&self,
		realm: &str,
		parent: ProtocolMapperParent<'_>,
	) -> Result<Vec<ProtocolMapperRepresentation>> {
		self.get(&models_path(realm, parent)).await
	}

	/// Replaces protocol mapper `id`.
	///
	/// The server rejects bodies without a matching `id`, so it is filled in when missing.
	pub async fn update_protocol_mapper(
		&self,
		realm: &str,
		parent: ProtocolMapperParent<'_>,
		id: &str,
		mapper: &ProtocolMapperRepresentation,
	) -> Result<()> {
		let path = model_path(realm, parent, id);

		if mapper.id.is_some() {
			return self.put(&path, mapper).await;
		}

		let mapper = ProtocolMapperRepresentation { id: Some(id.to_owned()), ..mapper.clone() };

		self.put(&path, &mapper).await
	}

	/// Deletes protocol mapper `id`.
	pub async fn delete_protocol_mapper(
		&self,
		realm: &str,
		parent: ProtocolMapperParent<'_>,
		id: &str,
	) -> Result<()> {
		self.delete(&model_path(realm, parent, id)).await
	}
}

fn models_path(realm: &str, parent: ProtocolMapperParent<'_>) -> String {
	let owner = match parent {
		ProtocolMapperParent::Client(id) => client_path(realm, id),
		ProtocolMapperParent::ClientScope(id) => scope_path(realm, id),
	};

	format!("{owner}/protocol-mappers/models")
}

fn model_path(realm: &str, parent: ProtocolMapperParent<'_>, id: &str) -> String {
	format!("{}/{}", models_path(realm, parent), escape(id))
}

/// Schema of `keycloak_generic_protocol_mapper`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_generic_protocol_mapper")
		.description(
			"Manages a protocol mapper of any type on a client or a client scope. \
			 Exactly one of `client_id` and `client_scope_id` must be set.",
		)
		.attribute(Attribute::computed("id", AttributeKind::String, "Server-assigned mapper ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::optional(
			"client_id",
			AttributeKind::String,
			"Server-assigned ID of the owning client.",
		))
		.attribute(Attribute::optional(
			"client_scope_id",
			AttributeKind::String,
			"Server-assigned ID of the owning client scope.",
		))
		.attribute(Attribute::required("name", AttributeKind::String, "Mapper name."))
		.attribute(Attribute::required(
			"protocol",
			AttributeKind::String,
			"`openid-connect` or `saml`.",
		))
		.attribute(Attribute::required(
			"protocol_mapper",
			AttributeKind::String,
			"Mapper implementation.",
		))
		.attribute(Attribute::required("config", AttributeKind::Map, "Mapper settings."))
		.import(ImportFormat::new(&["realm_id", "client_id", "id"]))
		.build()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parent_selects_the_models_collection() {
		assert_eq!(
			models_path("test", ProtocolMapperParent::Client("c-1")),
			"/realms/test/clients/c-1/protocol-mappers/models"
		);
		assert_eq!(
			model_path("test", ProtocolMapperParent::ClientScope("s-1"), "m-1"),
			"/realms/test/client-scopes/s-1/protocol-mappers/models/m-1"
		);
	}
}
