//! Login credentials and the OAuth grant each one selects.

// self
use crate::{
	_prelude::*,
	auth::{AdminClientId, Secret},
};

/// OAuth grant types the provider issues against the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Service-account login with a confidential client.
	ClientCredentials,
	/// Resource-owner password login, usually through `admin-cli`.
	Password,
	/// Refresh of a previously issued token.
	RefreshToken,
}
impl GrantType {
	/// Returns the wire value used in `grant_type`.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ClientCredentials => "client_credentials",
			Self::Password => "password",
			Self::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Credentials the client logs in with.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
	/// Confidential client with a service account.
	ClientCredentials {
		/// OAuth client identifier.
		client_id: AdminClientId,
		/// OAuth client secret.
		client_secret: Secret,
	},
	/// Admin user logging in through a (usually public) client.
	Password {
		/// OAuth client identifier.
		client_id: AdminClientId,
		/// Optional secret when the client is confidential.
		client_secret: Option<Secret>,
		/// Admin username.
		username: String,
		/// Admin password.
		password: Secret,
	},
}
impl Credentials {
	/// Builds client-credentials login material after validating the client identifier.
	pub fn client_credentials(
		client_id: &str,
		client_secret: impl Into<Secret>,
	) -> Result<Self, crate::auth::IdentifierError> {
		Ok(Self::ClientCredentials {
			client_id: AdminClientId::new(client_id)?,
			client_secret: client_secret.into(),
		})
	}

	/// Builds password login material after validating the client identifier.
	pub fn password(
		client_id: &str,
		username: impl Into<String>,
		password: impl Into<Secret>,
	) -> Result<Self, crate::auth::IdentifierError> {
		Ok(Self::Password {
			client_id: AdminClientId::new(client_id)?,
			client_secret: None,
			username: username.into(),
			password: password.into(),
		})
	}

	/// Attaches a client secret to password credentials; client-credentials are replaced.
	pub fn with_client_secret(self, secret: impl Into<Secret>) -> Self {
		match self {
			Self::ClientCredentials { client_id, .. } =>
				Self::ClientCredentials { client_id, client_secret: secret.into() },
			Self::Password { client_id, username, password, .. } =>
				Self::Password { client_id, client_secret: Some(secret.into()), username, password },
		}
	}

	/// Returns the OAuth client identifier.
	pub fn client_id(&self) -> &AdminClientId {
		match self {
			Self::ClientCredentials { client_id, .. } | Self::Password { client_id, .. } => client_id,
		}
	}

	/// Returns the client secret, if any.
	pub fn client_secret(&self) -> Option<&Secret> {
		match self {
			Self::ClientCredentials { client_secret, .. } => Some(client_secret),
			Self::Password { client_secret, .. } => client_secret.as_ref(),
		}
	}

	/// Grant used for the initial login.
	pub fn grant(&self) -> GrantType {
		match self {
			Self::ClientCredentials { .. } => GrantType::ClientCredentials,
			Self::Password { .. } => GrantType::Password,
		}
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ClientCredentials { client_id, .. } => f
				.debug_struct("ClientCredentials")
				.field("client_id", client_id)
				.field("client_secret", &"<redacted>")
				.finish(),
			Self::Password { client_id, client_secret, username, .. } => f
				.debug_struct("Password")
				.field("client_id", client_id)
				.field("client_secret_set", &client_secret.is_some())
				.field("username", username)
				.field("password", &"<redacted>")
				.finish(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn grant_follows_variant() {
		let service = Credentials::client_credentials("terraform", "secret")
			.expect("Client credentials should build.");
		let admin = Credentials::password("admin-cli", "keycloak", "password")
			.expect("Password credentials should build.");

		assert_eq!(service.grant(), GrantType::ClientCredentials);
		assert_eq!(admin.grant(), GrantType::Password);
		assert_eq!(admin.client_secret(), None);
		assert_eq!(
			admin.with_client_secret("s").client_secret().map(Secret::expose),
			Some("s")
		);
	}

	#[test]
	fn debug_output_hides_secrets() {
		let admin = Credentials::password("admin-cli", "keycloak", "hunter2")
			.expect("Password credentials should build.");
		let rendered = format!("{admin:?}");

		assert!(rendered.contains("keycloak"));
		assert!(!rendered.contains("hunter2"));
	}
}
