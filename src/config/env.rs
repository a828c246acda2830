// self
use crate::{
	_prelude::*,
	auth::{Credentials, IdentifierError},
	config::{ProviderConfig, ProviderConfigError},
};

/// Failures while reading the provider config from environment variables.
#[derive(Debug, ThisError)]
pub enum EnvConfigError {
	/// A required variable is unset or empty.
	#[error("Environment variable {name} is required.")]
	Missing {
		/// Variable name.
		name: &'static str,
	},
	/// A variable holds a value of the wrong shape.
	#[error("Environment variable {name} holds an invalid value: {value}.")]
	Invalid {
		/// Variable name.
		name: &'static str,
		/// Offending value.
		value: String,
	},
	/// Neither a client secret nor a username/password pair is set.
	#[error("Set KEYCLOAK_CLIENT_SECRET or both KEYCLOAK_USER and KEYCLOAK_PASSWORD.")]
	MissingCredentials,
	/// Client identifier is invalid.
	#[error(transparent)]
	ClientId(#[from] IdentifierError),
	/// Assembled config failed validation.
	#[error(transparent)]
	Config(#[from] ProviderConfigError),
}

impl ProviderConfig {
	/// Reads the config from the process environment (`KEYCLOAK_URL`, `KEYCLOAK_CLIENT_ID`, ...).
	pub fn from_env() -> Result<Self, EnvConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Reads the config through an arbitrary variable lookup.
	///
	/// Password credentials win when `KEYCLOAK_USER` and `KEYCLOAK_PASSWORD` are both set; the
	/// client secret is then attached to them if present.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, EnvConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let get = |name| lookup(name).filter(|value| !value.is_empty());
		let raw_url = get("KEYCLOAK_URL").ok_or(EnvConfigError::Missing { name: "KEYCLOAK_URL" })?;
		let url = Url::parse(&raw_url)
			.map_err(|_| EnvConfigError::Invalid { name: "KEYCLOAK_URL", value: raw_url })?;
		let client_id =
			get("KEYCLOAK_CLIENT_ID").ok_or(EnvConfigError::Missing { name: "KEYCLOAK_CLIENT_ID" })?;
		let secret = get("KEYCLOAK_CLIENT_SECRET");
		let credentials = match (get("KEYCLOAK_USER"), get("KEYCLOAK_PASSWORD"), secret) {
			(Some(username), Some(password), secret) => {
				let credentials = Credentials::password(&client_id, username, password)?;

				match secret {
					Some(secret) => credentials.with_client_secret(secret),
					None => credentials,
				}
			},
			(_, _, Some(secret)) => Credentials::client_credentials(&client_id, secret)?,
			_ => return Err(EnvConfigError::MissingCredentials),
		};
		let mut builder = ProviderConfig::builder(url).credentials(credentials);

		if let Some(base_path) = get("KEYCLOAK_BASE_PATH") {
			builder = builder.base_path(base_path);
		}
		if let Some(realm) = get("KEYCLOAK_REALM") {
			builder = builder.realm(realm);
		}
		if let Some(raw) = get("KEYCLOAK_CLIENT_TIMEOUT") {
			let secs = raw.parse::<i64>().map_err(|_| EnvConfigError::Invalid {
				name: "KEYCLOAK_CLIENT_TIMEOUT",
				value: raw.clone(),
			})?;

			builder = builder.client_timeout(Duration::seconds(secs));
		}
		if let Some(skip) = parse_flag(&get, "KEYCLOAK_TLS_INSECURE_SKIP_VERIFY")? {
			builder = builder.tls_insecure_skip_verify(skip);
		}
		if let Some(initial_login) = parse_flag(&get, "KEYCLOAK_INITIAL_LOGIN")? {
			builder = builder.initial_login(initial_login);
		}
		if let Some(red_hat_sso) = parse_flag(&get, "KEYCLOAK_RED_HAT_SSO")? {
			builder = builder.red_hat_sso(red_hat_sso);
		}

		Ok(builder.build()?)
	}
}

fn parse_flag<G>(get: &G, name: &'static str) -> Result<Option<bool>, EnvConfigError>
where
	G: Fn(&'static str) -> Option<String>,
{
	match get(name) {
		None => Ok(None),
		Some(raw) => match raw.to_ascii_lowercase().as_str() {
			"true" | "1" => Ok(Some(true)),
			"false" | "0" => Ok(Some(false)),
			_ => Err(EnvConfigError::Invalid { name, value: raw }),
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::GrantType;

	type Vars = &'static [(&'static str, &'static str)];

	fn lookup(vars: Vars) -> impl Fn(&'static str) -> Option<String> {
		move |name| vars.iter().find(|(key, _)| *key == name).map(|(_, value)| (*value).to_owned())
	}

	#[test]
	fn client_secret_selects_client_credentials() {
		let config = ProviderConfig::from_lookup(lookup(&[
			("KEYCLOAK_URL", "https://sso.example.com"),
			("KEYCLOAK_CLIENT_ID", "terraform"),
			("KEYCLOAK_CLIENT_SECRET", "s3cret"),
			("KEYCLOAK_REALM", "ops"),
			("KEYCLOAK_INITIAL_LOGIN", "0"),
		]))
		.expect("Config should be read.");

		assert_eq!(config.credentials.grant(), GrantType::ClientCredentials);
		assert_eq!(config.realm.as_ref(), "ops");
		assert!(!config.initial_login);
	}

	#[test]
	fn password_wins_over_client_secret() {
		let config = ProviderConfig::from_lookup(lookup(&[
			("KEYCLOAK_URL", "https://sso.example.com"),
			("KEYCLOAK_CLIENT_ID", "admin-cli"),
			("KEYCLOAK_CLIENT_SECRET", "s3cret"),
			("KEYCLOAK_USER", "admin"),
			("KEYCLOAK_PASSWORD", "hunter2"),
		]))
		.expect("Config should be read.");

		assert_eq!(config.credentials.grant(), GrantType::Password);
		assert!(config.credentials.client_secret().is_some());
	}

	#[test]
	fn malformed_values_are_reported_by_name() {
		let err = ProviderConfig::from_lookup(lookup(&[
			("KEYCLOAK_URL", "https://sso.example.com"),
			("KEYCLOAK_CLIENT_ID", "terraform"),
			("KEYCLOAK_CLIENT_SECRET", "s3cret"),
			("KEYCLOAK_TLS_INSECURE_SKIP_VERIFY", "maybe"),
		]))
		.expect_err("Flag should be rejected.");

		assert!(matches!(
			err,
			EnvConfigError::Invalid { name: "KEYCLOAK_TLS_INSECURE_SKIP_VERIFY", .. }
		));
		assert!(matches!(
			ProviderConfig::from_lookup(lookup(&[("KEYCLOAK_URL", "https://sso.example.com")])),
			Err(EnvConfigError::Missing { name: "KEYCLOAK_CLIENT_ID" })
		));
		assert!(matches!(
			ProviderConfig::from_lookup(lookup(&[
				("KEYCLOAK_URL", "https://sso.example.com"),
				("KEYCLOAK_CLIENT_ID", "terraform"),
			])),
			Err(EnvConfigError::MissingCredentials)
		));
	}
}
