//! Provider configuration: server location, login credentials, and transport settings.
//!
//! A [`ProviderConfig`] is assembled through [`ProviderConfigBuilder`] (or read from the
//! `KEYCLOAK_*` environment variables via [`ProviderConfig::from_env`]) and validated once;
//! the client derives its token endpoint and admin root from it.

/// Builder API and validation rules.
pub mod builder;
/// Environment-variable loading.
pub mod env;

pub use builder::*;
pub use env::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, RealmName},
	client::escape,
	error::ConfigError,
	schema::{Attribute, AttributeKind, ResourceSchema, SchemaError},
};

/// Default realm used for login.
pub const DEFAULT_LOGIN_REALM: &str = "master";
/// Default per-request timeout.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::seconds(5);
/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("keycloak-provider/", env!("CARGO_PKG_VERSION"));

/// Validated provider configuration.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
	/// Server root URL, without the base path.
	pub url: Url,
	/// Context path in front of every route (`/auth` on legacy servers, empty otherwise).
	pub base_path: String,
	/// Realm whose token endpoint issues admin tokens.
	pub realm: RealmName,
	/// Login credentials.
	pub credentials: Credentials,
	/// Timeout applied to every HTTP request.
	pub client_timeout: Duration,
	/// Skips TLS certificate verification.
	pub tls_insecure_skip_verify: bool,
	/// Extra PEM-encoded root certificate trusted for TLS.
	pub root_ca_certificate: Option<String>,
	/// Logs in while constructing the client instead of on the first request.
	pub initial_login: bool,
	/// Interprets server versions as Red Hat SSO releases.
	pub red_hat_sso: bool,
	/// Headers sent with every admin request.
	pub additional_headers: BTreeMap<String, String>,
	/// `User-Agent` header value.
	pub user_agent: String,
}
impl ProviderConfig {
	/// Creates a new builder for the provided server URL.
	pub fn builder(url: Url) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(url)
	}

	/// Token endpoint of the login realm.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		let tail = format!("realms/{}/protocol/openid-connect/token", escape(&self.realm));

		self.join("token", &tail)
	}

	/// Admin API root; every wrapper path is appended to it.
	pub fn admin_root(&self) -> Result<Url, ConfigError> {
		self.join("admin", "admin")
	}

	/// Builds the absolute URL of an admin path such as `/realms/master`.
	pub fn admin_url(&self, path: &str) -> Result<Url, ConfigError> {
		let root = self.admin_root()?;
		let joined = format!("{}{}", root.as_str().trim_end_matches('/'), path);

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "admin", source })
	}

	/// Schema of the provider configuration block.
	pub fn schema() -> Result<ResourceSchema, SchemaError> {
		ResourceSchema::builder("keycloak")
			.description(
				"The Keycloak provider manages realms, clients, roles, groups, users, identity \
				 providers and components through the Keycloak admin API.",
			)
			.attribute(Attribute::required(
				"url",
				AttributeKind::String,
				"Server root URL. Env: `KEYCLOAK_URL`.",
			))
			.attribute(Attribute::optional(
				"base_path",
				AttributeKind::String,
				"Context path in front of every route, `/auth` for legacy servers. \
				 Env: `KEYCLOAK_BASE_PATH`.",
			))
			.attribute(
				Attribute::optional(
					"realm",
					AttributeKind::String,
					"Realm used to obtain admin tokens. Env: `KEYCLOAK_REALM`.",
				)
				.default_value(DEFAULT_LOGIN_REALM),
			)
			.attribute(Attribute::required(
				"client_id",
				AttributeKind::String,
				"Client used to obtain admin tokens. Env: `KEYCLOAK_CLIENT_ID`.",
			))
			.attribute(
				Attribute::optional(
					"client_secret",
					AttributeKind::String,
					"Secret of the login client; required for the client credentials grant. \
					 Env: `KEYCLOAK_CLIENT_SECRET`.",
				)
				.sensitive(),
			)
			.attribute(Attribute::optional(
				"username",
				AttributeKind::String,
				"Username for the password grant. Env: `KEYCLOAK_USER`.",
			))
			.attribute(
				Attribute::optional(
					"password",
					AttributeKind::String,
					"Password for the password grant. Env: `KEYCLOAK_PASSWORD`.",
				)
				.sensitive(),
			)
			.attribute(
				Attribute::optional(
					"client_timeout",
					AttributeKind::Int,
					"Timeout of every HTTP request in seconds. Env: `KEYCLOAK_CLIENT_TIMEOUT`.",
				)
				.default_value("5"),
			)
			.attribute(
				Attribute::optional(
					"tls_insecure_skip_verify",
					AttributeKind::Bool,
					"Skips TLS certificate verification. Env: `KEYCLOAK_TLS_INSECURE_SKIP_VERIFY`.",
				)
				.default_value("false"),
			)
			.attribute(Attribute::optional(
				"root_ca_certificate",
				AttributeKind::String,
				"Extra PEM-encoded root certificate trusted for TLS.",
			))
			.attribute(
				Attribute::optional(
					"initial_login",
					AttributeKind::Bool,
					"Logs in when the provider starts instead of on the first request. \
					 Env: `KEYCLOAK_INITIAL_LOGIN`.",
				)
				.default_value("true"),
			)
			.attribute(
				Attribute::optional(
					"red_hat_sso",
					AttributeKind::Bool,
					"Interprets the server version as a Red Hat SSO release. \
					 Env: `KEYCLOAK_RED_HAT_SSO`.",
				)
				.default_value("false"),
			)
			.attribute(Attribute::optional(
				"additional_headers",
				AttributeKind::Map,
				"Headers sent with every admin request.",
			))
			.build()
	}

	fn join(&self, endpoint: &'static str, tail: &str) -> Result<Url, ConfigError> {
		let root = self.url.as_str().trim_end_matches('/');
		let joined = format!("{root}{}/{tail}", self.base_path);

		Url::parse(&joined).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(base_path: &str) -> ProviderConfig {
		let credentials = Credentials::client_credentials("terraform", "secret")
			.expect("Credentials fixture should be valid.");

		ProviderConfig::builder(
			Url::parse("https://sso.example.com").expect("Failed to parse server URL."),
		)
		.base_path(base_path)
		.credentials(credentials)
		.build()
		.expect("Config fixture should be valid.")
	}

	#[test]
	fn derived_urls_respect_base_path() {
		let modern = config("");
		let legacy = config("/auth");

		assert_eq!(
			modern.token_endpoint().expect("Token endpoint should parse.").as_str(),
			"https://sso.example.com/realms/master/protocol/openid-connect/token"
		);
		assert_eq!(
			legacy.token_endpoint().expect("Token endpoint should parse.").as_str(),
			"https://sso.example.com/auth/realms/master/protocol/openid-connect/token"
		);
		assert_eq!(
			legacy.admin_url("/realms/test/clients").expect("Admin URL should parse.").as_str(),
			"https://sso.example.com/auth/admin/realms/test/clients"
		);
	}

	#[test]
	fn token_endpoint_escapes_the_login_realm() {
		let credentials = Credentials::client_credentials("terraform", "secret")
			.expect("Credentials fixture should be valid.");
		let config = ProviderConfig::builder(
			Url::parse("https://sso.example.com").expect("Failed to parse server URL."),
		)
		.realm("ops#1?x")
		.credentials(credentials)
		.build()
		.expect("Config with a reserved realm character should build.");
		let url = config.token_endpoint().expect("Token endpoint should parse.");

		assert_eq!(url.path(), "/realms/ops%231%3Fx/protocol/openid-connect/token");
		assert_eq!(url.query(), None);
		assert_eq!(url.fragment(), None);
	}

	#[test]
	fn admin_url_keeps_query_strings() {
		let url = config("")
			.admin_url("/realms/test/clients?clientId=web")
			.expect("Admin URL should parse.");

		assert_eq!(url.path(), "/admin/realms/test/clients");
		assert_eq!(url.query(), Some("clientId=web"));
	}
}
