//! OpenID Connect clients, their secrets, service accounts and client scope bindings.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	client::{KeycloakClient, escape},
	resources::{ClientScopeRepresentation, UserRepresentation, realm_path},
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// Client representation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// OAuth `client_id`.
	pub client_id: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Whether the client may obtain tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// `openid-connect` or `saml`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub protocol: Option<String>,
	/// Public clients do not authenticate.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public_client: Option<bool>,
	/// Bearer-only clients never initiate logins.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bearer_only: Option<bool>,
	/// Client secret of confidential clients.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secret: Option<Secret>,
	/// Client authenticator, e.g. `client-secret` or `client-jwt`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_authenticator_type: Option<String>,
	/// Enables the authorization code flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub standard_flow_enabled: Option<bool>,
	/// Enables the implicit flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub implicit_flow_enabled: Option<bool>,
	/// Enables the resource owner password grant.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub direct_access_grants_enabled: Option<bool>,
	/// Enables the client credentials grant through a service account.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_accounts_enabled: Option<bool>,
	/// Enables fine-grained authorization services.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub authorization_services_enabled: Option<bool>,
	/// Requires user consent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub consent_required: Option<bool>,
	/// Puts every realm role into tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub full_scope_allowed: Option<bool>,
	/// Uses front-channel logout.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub frontchannel_logout: Option<bool>,
	/// Root URL prepended to relative URLs.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub root_url: Option<String>,
	/// Default landing URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_url: Option<String>,
	/// Back-channel admin URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub admin_url: Option<String>,
	/// Valid redirect URIs.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub redirect_uris: Vec<String>,
	/// Allowed CORS origins.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub web_origins: Vec<String>,
	/// Default client scope names; only honored on creation.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub default_client_scopes: Vec<String>,
	/// Optional client scope names; only honored on creation.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub optional_client_scopes: Vec<String>,
	/// Protocol-specific attributes such as `pkce.code.challenge.method`.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
}
impl ClientRepresentation {
	/// Creates an enabled OpenID Connect client.
	pub fn openid(client_id: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			enabled: Some(true),
			protocol: Some("openid-connect".into()),
			..Default::default()
		}
	}
}

/// Credential representation (client secrets, user passwords).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRepresentation {
	/// Credential type, e.g. `secret` or `password`.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Credential value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Secret>,
	/// Forces a change on next login (passwords only).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub temporary: Option<bool>,
}
impl CredentialRepresentation {
	/// Builds a password credential.
	pub fn password(value: impl Into<String>, temporary: bool) -> Self {
		Self {
			kind: Some("password".into()),
			value: Some(Secret::new(value)),
			temporary: Some(temporary),
		}
	}
}

/// Which list of client scopes a binding targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeBinding {
	/// Always included in tokens.
	Default,
	/// Included when requested through the `scope` parameter.
	Optional,
}
impl ScopeBinding {
	fn segment(self) -> &'static str {
		match self {
			Self::Default => "default-client-scopes",
			Self::Optional => "optional-client-scopes",
		}
	}
}

impl KeycloakClient {
	/// Creates a client and returns its ID.
	pub async fn create_client(
		&self,
		realm: &str,
		client: &ClientRepresentation,
	) -> Result<String> {
		self.post(&clients_path(realm), client).await
	}

	/// Reads a client by ID.
	pub async fn get_client(&self, realm: &str, id: &str) -> Result<ClientRepresentation> {
		self.get(&client_path(realm, id)).await
	}

	/// Looks a client up by its OAuth `client_id`.
	pub async fn find_client_by_client_id(
		&self,
		realm: &str,
		client_id: &str,
	) -> Result<Option<ClientRepresentation>> {
		let clients: Vec<ClientRepresentation> =
			self.get_query(&clients_path(realm), &[("clientId", client_id)]).await?;

		Ok(clients.into_iter().find(|client| client.client_id == client_id))
	}

	/// Lists every client of the realm.
	pub async fn list_clients(&self, realm: &str) -> Result<Vec<ClientRepresentation>> {
		self.get(&clients_path(realm)).await
	}

	/// Replaces client `id`.
	pub async fn update_client(
		&self,
		realm: &str,
		id: &str,
		client: &ClientRepresentation,
	) -> Result<()> {
		self.put(&client_path(realm, id), client).await
	}

	/// Deletes client `id`.
	pub async fn delete_client(&self, realm: &str, id: &str) -> Result<()> {
		self.delete(&client_path(realm, id)).await
	}

	/// Reads the current secret of a confidential client.
	pub async fn get_client_secret(
		&self,
		realm: &str,
		id: &str,
	) -> Result<CredentialRepresentation> {
		self.get(&format!("{}/client-secret", client_path(realm, id))).await
	}

	/// Generates a new secret for a confidential client.
	pub async fn regenerate_client_secret(
		&self,
		realm: &str,
		id: &str,
	) -> Result<CredentialRepresentation> {
		let path = format!("{}/client-secret", client_path(realm, id));

		self.post_returning(&path, &serde_json::Map::new()).await
	}

	/// Reads the service account user of a client with service accounts enabled.
	pub async fn get_service_account_user(
		&self,
		realm: &str,
		id: &str,
	) -> Result<UserRepresentation> {
		self.get(&format!("{}/service-account-user", client_path(realm, id))).await
	}

	/// Lists the client scopes bound to client `id`.
	pub async fn list_client_scope_bindings(
		&self,
		realm: &str,
		id: &str,
		binding: ScopeBinding,
	) -> Result<Vec<ClientScopeRepresentation>> {
		self.get(&format!("{}/{}", client_path(realm, id), binding.segment())).await
	}

	/// Binds client scope `scope_id` to client `id`.
	pub async fn attach_client_scope(
		&self,
		realm: &str,
		id: &str,
		binding: ScopeBinding,
		scope_id: &str,
	) -> Result<()> {
		self.put_unit(&binding_path(realm, id, binding, scope_id)).await
	}

	/// Unbinds client scope `scope_id` from client `id`.
	pub async fn detach_client_scope(
		&self,
		realm: &str,
		id: &str,
		binding: ScopeBinding,
		scope_id: &str,
	) -> Result<()> {
		self.delete(&binding_path(realm, id, binding, scope_id)).await
	}
}

fn clients_path(realm: &str) -> String {
	format!("{}/clients", realm_path(realm))
}

pub(crate) fn client_path(realm: &str, id: &str) -> String {
	format!("{}/clients/{}", realm_path(realm), escape(id))
}

fn binding_path(realm: &str, id: &str, binding: ScopeBinding, scope_id: &str) -> String {
	format!("{}/{}/{}", client_path(realm, id), binding.segment(), escape(scope_id))
}

/// Schema of `keycloak_openid_client`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_openid_client")
		.description("Manages an OpenID Connect client of a realm.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Server-assigned client ID."))
		.attribute(Attribute::required("realm_id", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required("client_id", AttributeKind::String, "OAuth client ID."))
		.attribute(Attribute::optional("name", AttributeKind::String, "Display name."))
		.attribute(Attribute::optional("description", AttributeKind::String, "Description."))
		.attribute(
			Attribute::optional("enabled", AttributeKind::Bool, "Whether the client may log in.")
				.default_value("true"),
		)
		.attribute(Attribute::required(
			"access_type",
			AttributeKind::String,
			"`CONFIDENTIAL`, `PUBLIC` or `BEARER-ONLY`.",
		))
		.attribute(
			Attribute::optional(
				"client_secret",
				AttributeKind::String,
				"Secret of a confidential client; generated when unset.",
			)
			.sensitive(),
		)
		.attribute(Attribute::optional(
			"standard_flow_enabled",
			AttributeKind::Bool,
			"Enables the authorization code flow.",
		))
		.attribute(Attribute::optional(
			"implicit_flow_enabled",
			AttributeKind::Bool,
			"Enables the implicit flow.",
		))
		.attribute(Attribute::optional(
			"direct_access_grants_enabled",
			AttributeKind::Bool,
			"Enables the resource owner password grant.",
		))
		.attribute(Attribute::optional(
			"service_accounts_enabled",
			AttributeKind::Bool,
			"Enables the client credentials grant.",
		))
		.attribute(Attribute::optional(
			"valid_redirect_uris",
			AttributeKind::Set,
			"Valid redirect URIs.",
		))
		.attribute(Attribute::optional("web_origins", AttributeKind::Set, "Allowed CORS origins."))
		.attribute(Attribute::optional("root_url", AttributeKind::String, "Root URL."))
		.attribute(Attribute::optional("base_url", AttributeKind::String, "Default landing URL."))
		.attribute(Attribute::optional(
			"admin_url",
			AttributeKind::String,
			"Back-channel admin URL.",
		))
		.attribute(Attribute::optional(
			"full_scope_allowed",
			AttributeKind::Bool,
			"Puts every realm role into tokens.",
		))
		.attribute(Attribute::optional(
			"pkce_code_challenge_method",
			AttributeKind::String,
			"`plain` or `S256`; stored as a client attribute.",
		))
		.attribute(Attribute::computed(
			"service_account_user_id",
			AttributeKind::String,
			"ID of the service account user, when service accounts are enabled.",
		))
		.import(ImportFormat::new(&["realm_id", "id"]))
		.build()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_secret_is_redacted_but_serialized() {
		let client = ClientRepresentation {
			secret: Some(Secret::from("s3cr3t")),
			..ClientRepresentation::openid("app")
		};
		let encoded = serde_json::to_value(&client).expect("Client should encode.");

		assert_eq!(encoded["secret"], "s3cr3t");
		assert_eq!(encoded["clientId"], "app");
		assert!(!format!("{client:?}").contains("s3cr3t"));
	}

	#[test]
	fn binding_paths_use_the_list_segment() {
		assert_eq!(
			binding_path("test", "c-1", ScopeBinding::Optional, "s-1"),
			"/realms/test/clients/c-1/optional-client-scopes/s-1"
		);
		assert_eq!(client_path("my realm", "c-1"), "/realms/my%20realm/clients/c-1");
	}

	#[test]
	fn password_credentials_use_type_field() {
		let encoded = serde_json::to_value(CredentialRepresentation::password("pw", true))
			.expect("Credential should encode.");

		assert_eq!(
			encoded,
			serde_json::json!({ "type": "password", "value": "pw", "temporary": true })
		);
	}
}
