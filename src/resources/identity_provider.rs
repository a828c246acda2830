//! Brokered identity providers and their mappers.
//!
//! Providers are addressed by alias; a create answers without a usable `Location`, so the alias
//! doubles as the resource ID.

// self
use crate::{
	_prelude::*,
	client::{KeycloakClient, escape},
	resources::realm_path,
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// Identity provider representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderRepresentation {
	/// Alias, unique within the realm.
	pub alias: String,
	/// Server-assigned internal ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub internal_id: Option<String>,
	/// Name shown on the login page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Provider implementation, e.g. `oidc`, `keycloak-oidc` or `saml`.
	pub provider_id: String,
	/// Whether the provider is offered.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Trusts e-mail addresses asserted by the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub trust_email: Option<bool>,
	/// Stores the provider's tokens after login.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub store_token: Option<bool>,
	/// Lets users only link accounts, never log in.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link_only: Option<bool>,
	/// Hides the provider from the login page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hide_on_login: Option<bool>,
	/// Flow run after the first login through this provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_broker_login_flow_alias: Option<String>,
	/// Flow run after every login through this provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post_broker_login_flow_alias: Option<String>,
	/// Provider-specific settings such as `clientId` and `authorizationUrl`.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub config: BTreeMap<String, String>,
}
impl IdentityProviderRepresentation {
	/// Creates an enabled provider.
	pub fn new(alias: impl Into<String>, provider_id: impl Into<String>) -> Self {
		Self {
			alias: alias.into(),
			provider_id: provider_id.into(),
			enabled: Some(true),
			..Default::default()
		}
	}
}

/// Identity provider mapper representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderMapperRepresentation {
	/// Server-assigned ID.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Mapper name.
	pub name: String,
	/// Alias of the owning provider.
	pub identity_provider_alias: String,
	/// Mapper implementation, e.g. `oidc-user-attribute-idp-mapper`.
	pub identity_provider_mapper: String,
	/// Mapper settings; `syncMode` is set by every mapper type.
	#[serde(default)]
	pub config: BTreeMap<String, String>,
}

impl KeycloakClient {
	/// Creates an identity provider; its alias is its ID.
	pub async fn create_identity_provider(
		&self,
		realm: &str,
		provider: &IdentityProviderRepresentation,
	) -> Result<()> {
		self.post_unit(&providers_path(realm), provider).await
	}

	/// Reads an identity provider by alias.
	pub async fn get_identity_provider(
		&self,
		realm: &str,
		alias: &str,
	) -> Result<IdentityProviderRepresentation> {
		self.get(&provider_path(realm, alias)).await
	}

	/// Lists the identity providers of the realm.
	pub async fn list_identity_providers(
		&self,
		realm: &str,
	) -> Result<Vec<IdentityProviderRepresentation>> {
		self.get(&providers_path(realm)).await
	}

	/// Replaces identity provider `alias`.
	pub async fn update_identity_provider(
		&self,
		realm: &str,
		alias: &str,
		provider: &IdentityProviderRepresentation,
	) -> Result<()> {
		self.put(&provider_path(realm, alias), provider).await
	}

	/// Deletes identity provider `alias` and its mappers.
	pub async fn delete_identity_provider(&self, realm: &str, alias: &str) -> Result<()> {
		self.delete(&provider_path(realm, alias)).await
	}

	/// Creates a mapper on the provider named by `mapper.identity_provider_alias`.
	pub async fn create_identity_provider_mapper(
		&self,
		realm: &str,
		mapper: &IdentityProviderMapperRepresentation,
	) -> Result<String> {
		self.post(&mappers_path(realm, &mapper.identity_provider_alias), mapper).await
	}

	/// Reads mapper `id` of provider `alias`.
	pub async fn get_identity_provider_mapper(
		&self,
		realm: &str,
		alias: &str,
		id: &str,
	) -> Result<IdentityProviderMapperRepresentation> {
		self.get(&mapper_path(realm, alias, id)).await
	}

	/// Lists the mappers of provider `alias`.
	pub async fn list_identity_provider_mappers(
		&self,
		realm: &str,
		alias: &str,
	) -> Result<Vec<IdentityProviderMapperRepresentation>> {
		self.get(&mappers_path(realm, alias)).await
	}

	/// Replaces mapper `id` of the provider named by `mapper.identity_provider_alias`.
	pub async fn update_identity_provider_mapper(
		&self,
		realm: &str,
		id: &str,
		mapper: &IdentityProviderMapperRepresentation,
	) -> Result<()> {
		self.put(&mapper_path(realm, &mapper.identity_provider_alias, id), mapper).await
	}

	/// Deletes mapper `id` of provider `alias`.
	pub async fn delete_identity_provider_mapper(
		&self,
		realm: &str,
		alias: &str,
		id: &str,
	) -> Result<()> {
		self.delete(&mapper_path(realm, alias, id)).await
	}
}

fn providers_path(realm: &str) -> String {
	format!("{}/identity-provider/instances", realm_path(realm))
}

fn provider_path(realm: &str, alias: &str) -> String {
	format!("{}/{}", providers_path(realm), escape(alias))
}

fn mappers_path(realm: &str, alias: &str) -> String {
	format!("{}/mappers", provider_path(realm, alias))
}

fn mapper_path(realm: &str, alias: &str, id: &str) -> String {
	format!("{}/{}", mappers_path(realm, alias), escape(id))
}

/// Schema of `keycloak_oidc_identity_provider`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_oidc_identity_provider")
		.description("Manages an OpenID Connect identity provider brokered by a realm.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Same as `alias`."))
		.attribute(Attribute::required("realm", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required("alias", AttributeKind::String, "Provider alias."))
		.attribute(Attribute::computed(
			"internal_id",
			AttributeKind::String,
			"Server-assigned internal ID.",
		))
		.attribute(Attribute::optional("display_name", AttributeKind::String, "Login page label."))
		.attribute(
			Attribute::optional("provider_id", AttributeKind::String, "Provider implementation.")
				.default_value("oidc"),
		)
		.attribute(
			Attribute::optional("enabled", AttributeKind::Bool, "Whether the provider is offered.")
				.default_value("true"),
		)
		.attribute(Attribute::required(
			"authorization_url",
			AttributeKind::String,
			"Authorization endpoint of the upstream provider.",
		))
		.attribute(Attribute::required(
			"token_url",
			AttributeKind::String,
			"Token endpoint of the upstream provider.",
		))
		.attribute(Attribute::required(
			"client_id",
			AttributeKind::String,
			"Client ID registered upstream.",
		))
		.attribute(
			Attribute::required(
				"client_secret",
				AttributeKind::String,
				"Client secret registered upstream.",
			)
			.sensitive(),
		)
		.attribute(Attribute::optional(
			"trust_email",
			AttributeKind::Bool,
			"Trusts upstream e-mail addresses.",
		))
		.attribute(Attribute::optional(
			"store_token",
			AttributeKind::Bool,
			"Stores upstream tokens.",
		))
		.attribute(
			Attribute::optional(
				"first_broker_login_flow_alias",
				AttributeKind::String,
				"Flow run after the first login.",
			)
			.default_value("first broker login"),
		)
		.attribute(Attribute::optional(
			"extra_config",
			AttributeKind::Map,
			"Additional provider settings merged into `config`.",
		))
		.import(ImportFormat::new(&["realm", "alias"]))
		.build()
}

/// Schema of `keycloak_custom_identity_provider_mapper`.
pub fn mapper_schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_custom_identity_provider_mapper")
		.description("Manages a mapper of any type attached to an identity provider.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Server-assigned mapper ID."))
		.attribute(Attribute::required("realm", AttributeKind::String, "Owning realm."))
		.attribute(Attribute::required("name", AttributeKind::String, "Mapper name."))
		.attribute(Attribute::required(
			"identity_provider_alias",
			AttributeKind::String,
			"Alias of the owning provider.",
		))
		.attribute(Attribute::required(
			"identity_provider_mapper",
			AttributeKind::String,
			"Mapper implementation.",
		))
		.attribute(Attribute::optional(
			"extra_config",
			AttributeKind::Map,
			"Mapper settings.",
		))
		.import(ImportFormat::new(&["realm", "identity_provider_alias", "id"]))
		.build()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn mapper_paths_nest_under_the_alias() {
		assert_eq!(
			mapper_path("test", "corp sso", "m-1"),
			"/realms/test/identity-provider/instances/corp%20sso/mappers/m-1"
		);
	}

	#[test]
	fn provider_config_stays_flat() {
		let mut provider = IdentityProviderRepresentation::new("corp", "oidc");

		provider.config.insert("clientId".into(), "broker".into());

		let encoded = serde_json::to_value(&provider).expect("Provider should encode.");

		assert_eq!(encoded["providerId"], "oidc");
		assert_eq!(encoded["config"]["clientId"], "broker");
		assert!(encoded.get("internalId").is_none());
	}

	#[test]
	fn mapper_import_takes_three_parts() {
		let schema = mapper_schema().expect("Schema should build.");
		let id = schema
			.parse_import_id("test/corp/m-1")
			.expect("Import ID should parse.")
			.expect("Mappers should be importable.");

		assert_eq!(id.get("identity_provider_alias"), Some("corp"));
		assert!(schema.parse_import_id("test/corp").is_err());
	}
}
