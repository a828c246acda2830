//! Typed Keycloak admin API client for declarative infrastructure providers: token-aware
//! request plumbing, per-entity CRUD wrappers, component config adapters, and a schema-driven
//! documentation generator.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod component;
pub mod config;
pub mod docs;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod resources;
pub mod schema;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::KeycloakClient,
		config::{ProviderConfig, ProviderConfigBuilder},
	};

	/// Client identifier used by the test fixtures.
	pub const TEST_CLIENT_ID: &str = "terraform";
	/// Client secret used by the test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "884e0f95-0f42-4a63-9b1f-94274655669e";

	/// Returns a config builder pointed at `base_url` with client-credentials auth and lazy login.
	pub fn test_config_builder(base_url: &str) -> ProviderConfigBuilder {
		let url = Url::parse(base_url).expect("Failed to parse mock server URL.");
		let credentials = Credentials::client_credentials(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
			.expect("Failed to build test credentials.");

		ProviderConfig::builder(url).credentials(credentials).initial_login(false)
	}

	/// Builds a lazily authenticating client against the mock server at `base_url`.
	pub async fn test_client(base_url: &str) -> KeycloakClient {
		let config = test_config_builder(base_url).build().expect("Failed to build test config.");

		KeycloakClient::new(config).await.expect("Failed to build test client.")
	}

	/// Token endpoint path for the login realm used by the fixtures.
	pub fn token_path() -> &'static str {
		"/realms/master/protocol/openid-connect/token"
	}

	/// Token endpoint response body issuing `access` with an optional refresh token.
	pub fn token_body(access: &str, refresh: Option<&str>) -> String {
		let mut body = serde_json::json!({
			"access_token": access,
			"token_type": "Bearer",
			"expires_in": 300,
		});

		if let Some(refresh) = refresh {
			body["refresh_token"] = refresh.into();
			body["refresh_expires_in"] = 1800.into();
		}

		body.to_string()
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method, StatusCode};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(feature = "docsgen")] use {clap as _, color_eyre as _};
#[cfg(test)] use {color_eyre as _, httpmock as _, tempfile as _, tokio as _};
