//! Client scopes and the realm-wide default scope lists.

// self
use crate::{
	_prelude::*,
	client::{KeycloakClient, escape},
	resources::{ProtocolMapperRepresentation, client::ScopeBinding, realm_path},
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// Client scope representation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientScopeRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Scope name, used in the `scope` parameter.
	pub name: String,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// `openid-connect` or `saml`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub protocol: Option<String>,
	/// Attributes such as `include.in.token.scope` and `consent.screen.text`.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
	/// Mappers attached to the scope; returned on reads only.
	#[serde(default, skip_serializing)]
	pub protocol_mappers: Vec<ProtocolMapperRepresentation>,
}

impl KeycloakClient {
	/// Creates a client scope and returns its ID.
	pub async fn create_client_scope(
		&self,
		realm: &str,
		scope: &ClientScopeRepresentation,
	) -> Result<String> {
		self.post(&scopes_path(realm), scope).await
	}

	/// Reads a client scope by ID.
	pub async fn get_client_scope(
		&self,
		realm: &str,
		id: &str,
	) -> Result<ClientScopeRepresentation> {
		self.get(&scope_path(realm, id)).await
	}

	/// Lists every client scope of the realm.
	pub async fn list_client_scopes(&self, realm: &str) -> Result<Vec<ClientScopeRepresentation>> {
		self.get(&scopes_path(realm)).await
	}

	/// Replaces client scope `id`.
	pub async fn update_client_scope(
		&self,
		realm: &str,
		id: &str,
		scope: &ClientScopeRepresentation,
	) -> Result<()> {
		self.put(&scope_path(realm, id), scope).await
	}

	/// Deletes client scope `id`.
	pub async fn delete_client_scope(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&scope_path(realm, id)).await
	}

	/// Lists the scopes new clients of the realm receive.
	pub async fn list_realm_client_scopes(
		&self,
		realm: &str,
		binding: ScopeBinding,
	) -> Result<Vec<ClientScopeRepresentation>> {
		self.get(&format!("{}/{}", realm_path(realm), realm_segment(binding))).await
	}

	/// Adds client scope `id` to the scopes new clients receive.
	pub async fn add_realm_client_scope(
		&self,
		realm: &str,
		binding: ScopeBinding,
		id: &str,
	) -> Result<()> {
		self.put_unit(&realm_binding_path(realm, binding, id)).await
	}

	/// Removes client scope `id` from the scopes new clients receive.
	pub async fn remove_realm_client_scope(
		&self,
		realm: &str,
		binding: ScopeBinding,
		id: &str,
	) -> Result<()> {
		self.delete(&realm_binding_path(realm, binding, id)).await
	}
}

fn scopes_path(realm: &str) -> String {
	format!("{}/client-scopes", realm_path(realm))
}

pub(crate) fn scope_path(realm: &str, id: &str) -> String {
	format!("{}/client-scopes/{}", realm_path(realm), escape(id))
}

fn realm_segment(binding: ScopeBinding) -> &'static str {
	match binding {
		ScopeBinding::Default => "default-default-client-scopes",
		ScopeBinding::Optional => "default-optional-client-scopes",
	}
}

fn realm_binding_path(realm: &str, binding: ScopeBinding, id: &str) -> String {
	format!("{}/{}/{}", realm_path(realm), realm_segment(binding), escape(id))
}

/// Schema of `keycloak_openid_client_scope`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_openid_client_scope")
		.description("Manages an OpenID Connect client scope of a realm.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Server-assigned scope ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required("name", AttributeKind::String, "Scope name."))
		.attribute(Attribute::optional("description", AttributeKind::String, "Description."))
		.attribute(Attribute::optional(
			"consent_screen_text",
			AttributeKind::String,
			"Text shown on the consent screen.",
		))
		.attribute(
			Attribute::optional(
				"include_in_token_scope",
				AttributeKind::Bool,
				"Lists the scope in the token's `scope` claim.",
			)
			.default_value("true"),
		)
		.attribute(Attribute::optional(
			"gui_order",
			AttributeKind::Int,
			"Order on the consent screen.",
		))
		.import(ImportFormat::new(&["realm_id", "id"]))
		.build()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn realm_bindings_use_default_prefixed_lists() {
		assert_eq!(
			realm_binding_path("test", ScopeBinding::Default, "s-1"),
			"/realms/test/default-default-client-scopes/s-1"
		);
		assert_eq!(
			realm_binding_path("test", ScopeBinding::Optional, "s-1"),
			"/realms/test/default-optional-client-scopes/s-1"
		);
	}

	#[test]
	fn mappers_are_read_but_never_written() {
		let scope: ClientScopeRepresentation = serde_json::from_value(serde_json::json!({
			"id": "s-1",
			"name": "profile",
			"protocol": "openid-connect",
			"protocolMappers": [{
				"id": "m-1",
				"name": "family name",
				"protocol": "openid-connect",
				"protocolMapper": "oidc-usermodel-property-mapper",
				"config": { "claim.name": "family_name" }
			}]
		}))
		.expect("Scope should decode.");

		assert_eq!(scope.protocol_mappers.len(), 1);

		let encoded = serde_json::to_value(&scope).expect("Scope should encode.");

		assert!(encoded.get("protocolMappers").is_none());
	}
}
