//! Realms.

// self
use crate::{
	_prelude::*,
	client::KeycloakClient,
	resources::realm_path,
	schema::{Attribute, AttributeKind, ImportFormat, ResourceSchema, SchemaError},
};

/// Realm representation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmRepresentation {
	/// Internal ID; equals the realm name unless set explicitly on creation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Realm name.
	pub realm: String,
	/// Whether users can log in.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Name shown on the login page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Display name rendered as HTML.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name_html: Option<String>,
	/// Lets users manage their own resources in the account console.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_managed_access: Option<bool>,
	/// Shows a registration link on the login page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registration_allowed: Option<bool>,
	/// Uses the email address as username.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registration_email_as_username: Option<bool>,
	/// Lets users change their username.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub edit_username_allowed: Option<bool>,
	/// Shows a forgot-password link on the login page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reset_password_allowed: Option<bool>,
	/// Shows a remember-me checkbox on the login page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub remember_me: Option<bool>,
	/// Requires users to verify their email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verify_email: Option<bool>,
	/// Lets users log in with their email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub login_with_email_allowed: Option<bool>,
	/// Lets several users share an email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duplicate_emails_allowed: Option<bool>,
	/// Which requests require TLS: `none`, `external` or `all`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ssl_required: Option<String>,
	/// Theme of the login pages.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub login_theme: Option<String>,
	/// Theme of the account pages.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub account_theme: Option<String>,
	/// Theme of the admin pages.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub admin_theme: Option<String>,
	/// Theme of outgoing emails.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email_theme: Option<String>,
	/// Access token lifespan in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token_lifespan: Option<i64>,
	/// Authorization code lifespan in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_code_lifespan: Option<i64>,
	/// Idle timeout of SSO sessions in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sso_session_idle_timeout: Option<i64>,
	/// Maximum lifespan of SSO sessions in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sso_session_max_lifespan: Option<i64>,
	/// Idle timeout of offline sessions in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub offline_session_idle_timeout: Option<i64>,
	/// Password policy expression.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password_policy: Option<String>,
	/// Algorithm used to sign tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_signature_algorithm: Option<String>,
	/// Whether users may pick a locale.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub internationalization_enabled: Option<bool>,
	/// Locales offered when internationalization is enabled.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub supported_locales: Vec<String>,
	/// Locale used when none is requested.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_locale: Option<String>,
	/// Alias of the authentication flow bound as browser flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub browser_flow: Option<String>,
	/// Alias of the authentication flow bound as registration flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registration_flow: Option<String>,
	/// Alias of the authentication flow bound as direct grant flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub direct_grant_flow: Option<String>,
	/// Alias of the authentication flow bound as reset credentials flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reset_credentials_flow: Option<String>,
	/// Alias of the authentication flow bound as client authentication flow.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_authentication_flow: Option<String>,
	/// SMTP settings (`host`, `port`, `from`, `auth`, ...).
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub smtp_server: BTreeMap<String, String>,
	/// Free-form realm attributes.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
}
impl RealmRepresentation {
	/// Creates an enabled realm called `realm`.
	pub fn new(realm: impl Into<String>) -> Self {
		Self { realm: realm.into(), enabled: Some(true), ..Default::default() }
	}
}

impl KeycloakClient {
	/// Creates a realm.
	pub async fn create_realm(&self, realm: &RealmRepresentation) -> Result<()> {
		self.post_unit("/realms", realm).await
	}

	/// Reads a realm by name.
	pub async fn get_realm(&self, realm: &str) -> Result<RealmRepresentation> {
		self.get(&realm_path(realm)).await
	}

	/// Reads a realm by name, returning `None` if it does not exist.
	pub async fn find_realm(&self, realm: &str) -> Result<Option<RealmRepresentation>> {
		self.get_optional(&realm_path(realm)).await
	}

	/// Lists every realm visible to the admin token.
	pub async fn list_realms(&self) -> Result<Vec<RealmRepresentation>> {
		self.get("/realms").await
	}

	/// Replaces the realm named by `realm.realm`.
	pub async fn update_realm(&self, realm: &RealmRepresentation) -> Result<()> {
		self.put(&realm_path(&realm.realm), realm).await
	}

	/// Deletes a realm; the call is repeated once on failure.
	pub async fn delete_realm(&self, realm: &str) -> Result<()> {
		self.delete_retrying_once(&realm_path(realm)).await
	}
}

/// Schema of `keycloak_realm`.
pub fn schema() -> Result<ResourceSchema, SchemaError> {
	ResourceSchema::builder("keycloak_realm")
		.description("Manages a realm, the tenant that owns clients, users, roles and groups.")
		.attribute(Attribute::computed("id", AttributeKind::String, "Internal realm ID."))
		.attribute(Attribute::required("realm", AttributeKind::String, "Realm name."))
		.attribute(
			Attribute::optional("enabled", AttributeKind::Bool, "Whether users can log in.")
				.default_value("true"),
		)
		.attribute(Attribute::optional("display_name", AttributeKind::String, "Display name."))
		.attribute(Attribute::optional(
			"display_name_html",
			AttributeKind::String,
			"Display name rendered as HTML.",
		))
		.attribute(Attribute::optional(
			"user_managed_access",
			AttributeKind::Bool,
			"Lets users manage their own resources in the account console.",
		))
		.attribute(Attribute::optional(
			"registration_allowed",
			AttributeKind::Bool,
			"Shows a registration link on the login page.",
		))
		.attribute(Attribute::optional(
			"registration_email_as_username",
			AttributeKind::Bool,
			"Uses the email address as username.",
		))
		.attribute(Attribute::optional(
			"reset_password_allowed",
			AttributeKind::Bool,
			"Shows a forgot-password link on the login page.",
		))
		.attribute(Attribute::optional(
			"remember_me",
			AttributeKind::Bool,
			"Shows a remember-me checkbox on the login page.",
		))
		.attribute(Attribute::optional(
			"verify_email",
			AttributeKind::Bool,
			"Requires users to verify their email address.",
		))
		.attribute(Attribute::optional(
			"login_with_email_allowed",
			AttributeKind::Bool,
			"Lets users log in with their email address.",
		))
		.attribute(
			Attribute::optional(
				"ssl_required",
				AttributeKind::String,
				"Which requests require TLS: `none`, `external` or `all`.",
			)
			.default_value("external"),
		)
		.attribute(Attribute::optional("login_theme", AttributeKind::String, "Login theme."))
		.attribute(Attribute::optional("account_theme", AttributeKind::String, "Account theme."))
		.attribute(Attribute::optional("admin_theme", AttributeKind::String, "Admin theme."))
		.attribute(Attribute::optional("email_theme", AttributeKind::String, "Email theme."))
		.attribute(Attribute::optional(
			"access_token_lifespan",
			AttributeKind::Int,
			"Access token lifespan in seconds.",
		))
		.attribute(Attribute::optional(
			"sso_session_idle_timeout",
			AttributeKind::Int,
			"Idle timeout of SSO sessions in seconds.",
		))
		.attribute(Attribute::optional(
			"sso_session_max_lifespan",
			AttributeKind::Int,
			"Maximum lifespan of SSO sessions in seconds.",
		))
		.attribute(Attribute::optional(
			"password_policy",
			AttributeKind::String,
			"Password policy, e.g. `upperCase(1) and length(8)`.",
		))
		.attribute(Attribute::optional(
			"default_signature_algorithm",
			AttributeKind::String,
			"Algorithm used to sign tokens.",
		))
		.attribute(Attribute::optional(
			"supported_locales",
			AttributeKind::Set,
			"Locales offered when internationalization is enabled.",
		))
		.attribute(Attribute::optional(
			"default_locale",
			AttributeKind::String,
			"Locale used when none is requested.",
		))
		.attribute(Attribute::optional("smtp_server", AttributeKind::Map, "SMTP settings."))
		.attribute(Attribute::optional("attributes", AttributeKind::Map, "Free-form attributes."))
		.import(ImportFormat::new(&["realm"]))
		.build()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unset_fields_are_omitted() {
		let encoded = serde_json::to_value(RealmRepresentation::new("test"))
			.expect("Realm should encode.");

		assert_eq!(encoded, serde_json::json!({ "realm": "test", "enabled": true }));
	}

	#[test]
	fn unknown_fields_are_ignored() {
		let realm: RealmRepresentation = serde_json::from_value(serde_json::json!({
			"id": "b7f8",
			"realm": "test",
			"sslRequired": "external",
			"bruteForceProtected": false
		}))
		.expect("Realm should decode.");

		assert_eq!(realm.id.as_deref(), Some("b7f8"));
		assert_eq!(realm.ssl_required.as_deref(), Some("external"));
	}
}
