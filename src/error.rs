//! Crate-level error types shared by the admin client, token flows, and adapters.

// self
use crate::{
	_prelude::*, client::VersionParseError, component::ComponentConfigError, schema::ImportIdError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Admin API answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Component config could not be folded into a typed model.
	#[error(transparent)]
	Component(#[from] ComponentConfigError),
	/// Import identifier did not match the resource's format.
	#[error(transparent)]
	Import(#[from] ImportIdError),
	/// Server reported a version string that cannot be compared.
	#[error(transparent)]
	Version(#[from] VersionParseError),

	/// Token endpoint rejected the grant (bad password, expired refresh token).
	#[error("Token endpoint rejected the grant: {reason}.")]
	InvalidGrant {
		/// Server-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Server-supplied reason string.
		reason: String,
	},
	/// Response body did not match the expected representation.
	#[error("Failed to decode response from {path}.")]
	Decode {
		/// Request path that produced the body.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A create call did not return a usable `Location` header.
	#[error("Response from {path} carries no usable Location header.")]
	MissingLocation {
		/// Request path that produced the response.
		path: String,
	},
}
impl Error {
	/// Returns `true` when the server reported the entity as missing.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Api(api) if api.status == StatusCode::NOT_FOUND)
	}

	/// Returns `true` when the server reported a conflicting entity.
	pub fn is_conflict(&self) -> bool {
		matches!(self, Self::Api(api) if api.status == StatusCode::CONFLICT)
	}

	/// Returns the HTTP status attached to an API error, if any.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::Api(api) => Some(api.status),
			_ => None,
		}
	}
}

/// Non-success response returned by the admin API.
#[derive(Debug, ThisError)]
#[error("{method} {path} failed with status {status}: {body}")]
pub struct ApiError {
	/// Request method.
	pub method: Method,
	/// Request path relative to the admin root.
	pub path: String,
	/// Response status code.
	pub status: StatusCode,
	/// Raw response body, possibly empty.
	pub body: String,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// An endpoint derived from the config is not a valid URL.
	#[error("Derived {endpoint} URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider config failed validation.
	#[error(transparent)]
	Provider(#[from] crate::config::ProviderConfigError),
	/// Token record builder validation failed.
	#[error("Unable to build token record.")]
	TokenBuild(#[from] crate::auth::TokenRecordBuilderError),
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Request body could not be serialized.
	#[error("Request body for {path} could not be serialized.")]
	SerializeBody {
		/// Request path the body was meant for.
		path: String,
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Token endpoint returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {target}.")]
	Network {
		/// Endpoint label (`token endpoint` or an admin path).
		target: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		target: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { target: target.into(), source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn api_error(status: StatusCode) -> Error {
		ApiError {
			method: Method::GET,
			path: "/realms/test".into(),
			status,
			body: "{\"error\":\"Realm not found.\"}".into(),
		}
		.into()
	}

	#[test]
	fn status_helpers_classify_api_errors() {
		let missing = api_error(StatusCode::NOT_FOUND);

		assert!(missing.is_not_found());
		assert!(!missing.is_conflict());
		assert_eq!(missing.status(), Some(StatusCode::NOT_FOUND));
		assert!(api_error(StatusCode::CONFLICT).is_conflict());
		assert!(!Error::MissingLocation { path: "/realms".into() }.is_not_found());
	}

	#[test]
	fn api_error_message_carries_status_and_body() {
		let message = api_error(StatusCode::NOT_FOUND).to_string();

		assert!(message.contains("GET /realms/test"));
		assert!(message.contains("404"));
		assert!(message.contains("Realm not found."));
	}
}
