// self
use crate::{
	_prelude::*,
	auth::{Credentials, RealmName},
	config::{DEFAULT_CLIENT_TIMEOUT, DEFAULT_LOGIN_REALM, DEFAULT_USER_AGENT, ProviderConfig},
};

/// Errors raised while constructing or validating a [`ProviderConfig`].
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderConfigError {
	/// Login credentials are mandatory.
	#[error("Missing login credentials.")]
	MissingCredentials,
	/// Server URL must use HTTP or HTTPS.
	#[error("Server URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// URL that failed validation.
		url: String,
	},
	/// Base path must be empty or an absolute path without a trailing slash.
	#[error("Base path `{base_path}` must be empty or start with '/' and not end with '/'.")]
	InvalidBasePath {
		/// Base path that failed validation.
		base_path: String,
	},
	/// Realm name is not a valid identifier.
	#[error("Login realm `{realm}` is invalid.")]
	InvalidRealm {
		/// Realm name that failed validation.
		realm: String,
	},
	/// Timeouts must be positive.
	#[error("Client timeout must be positive.")]
	NonPositiveTimeout,
	/// Additional headers cannot replace the bearer token.
	#[error("Additional header `{name}` is reserved.")]
	ReservedHeader {
		/// Offending header name.
		name: String,
	},
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	/// Server root URL.
	pub url: Url,
	/// Context path in front of every route.
	pub base_path: String,
	/// Login realm name.
	pub realm: String,
	/// Login credentials.
	pub credentials: Option<Credentials>,
	/// Per-request timeout.
	pub client_timeout: Duration,
	/// Skips TLS certificate verification.
	pub tls_insecure_skip_verify: bool,
	/// Extra PEM-encoded root certificate.
	pub root_ca_certificate: Option<String>,
	/// Logs in eagerly.
	pub initial_login: bool,
	/// Interprets versions as Red Hat SSO releases.
	pub red_hat_sso: bool,
	/// Headers sent with every admin request.
	pub additional_headers: BTreeMap<String, String>,
	/// `User-Agent` header value.
	pub user_agent: String,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with defaults for the provided server URL.
	pub fn new(url: Url) -> Self {
		Self {
			url,
			base_path: String::new(),
			realm: DEFAULT_LOGIN_REALM.into(),
			credentials: None,
			client_timeout: DEFAULT_CLIENT_TIMEOUT,
			tls_insecure_skip_verify: false,
			root_ca_certificate: None,
			initial_login: true,
			red_hat_sso: false,
			additional_headers: BTreeMap::new(),
			user_agent: DEFAULT_USER_AGENT.into(),
		}
	}

	/// Sets the context path (for example `/auth`).
	pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
		self.base_path = base_path.into();

		self
	}

	/// Sets the login realm.
	pub fn realm(mut self, realm: impl Into<String>) -> Self {
		self.realm = realm.into();

		self
	}

	/// Sets the login credentials.
	pub fn credentials(mut self, credentials: Credentials) -> Self {
		self.credentials = Some(credentials);

		self
	}

	/// Overrides the per-request timeout.
	pub fn client_timeout(mut self, timeout: Duration) -> Self {
		self.client_timeout = timeout;

		self
	}

	/// Toggles TLS certificate verification.
	pub fn tls_insecure_skip_verify(mut self, skip: bool) -> Self {
		self.tls_insecure_skip_verify = skip;

		self
	}

	/// Trusts an extra PEM-encoded root certificate.
	pub fn root_ca_certificate(mut self, pem: impl Into<String>) -> Self {
		self.root_ca_certificate = Some(pem.into());

		self
	}

	/// Toggles eager login.
	pub fn initial_login(mut self, initial_login: bool) -> Self {
		self.initial_login = initial_login;

		self
	}

	/// Toggles Red Hat SSO version interpretation.
	pub fn red_hat_sso(mut self, red_hat_sso: bool) -> Self {
		self.red_hat_sso = red_hat_sso;

		self
	}

	/// Adds a header sent with every admin request.
	pub fn additional_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.additional_headers.insert(name.into(), value.into());

		self
	}

	/// Overrides the `User-Agent` header value.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		let credentials = self.credentials.ok_or(ProviderConfigError::MissingCredentials)?;
		let realm = RealmName::new(&self.realm)
			.map_err(|_| ProviderConfigError::InvalidRealm { realm: self.realm.clone() })?;
		let config = ProviderConfig {
			url: self.url,
			base_path: self.base_path,
			realm,
			credentials,
			client_timeout: self.client_timeout,
			tls_insecure_skip_verify: self.tls_insecure_skip_verify,
			root_ca_certificate: self.root_ca_certificate,
			initial_login: self.initial_login,
			red_hat_sso: self.red_hat_sso,
			additional_headers: self.additional_headers,
			user_agent: self.user_agent,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ProviderConfig {
	fn validate(&self) -> Result<(), ProviderConfigError> {
		if !matches!(self.url.scheme(), "http" | "https") {
			return Err(ProviderConfigError::UnsupportedScheme { url: self.url.to_string() });
		}
		if !self.base_path.is_empty()
			&& (!self.base_path.starts_with('/') || self.base_path.ends_with('/'))
		{
			return Err(ProviderConfigError::InvalidBasePath { base_path: self.base_path.clone() });
		}
		if !self.client_timeout.is_positive() {
			return Err(ProviderConfigError::NonPositiveTimeout);
		}
		if let Some(name) =
			self.additional_headers.keys().find(|name| name.eq_ignore_ascii_case("authorization"))
		{
			return Err(ProviderConfigError::ReservedHeader { name: name.clone() });
		}

		Ok(())
	}
}
