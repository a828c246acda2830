//! Token acquisition against the login realm's OIDC token endpoint.
//!
//! [`TokenFacade`] wraps an `oauth2` [`BasicClient`] configured for request-body client
//! authentication (the server accepts `client_id`/`client_secret` form fields for both
//! confidential and public clients). It performs the login grant chosen by the configured
//! [`Credentials`] and the refresh-token grant, mapping every failure into the crate's
//! [`Error`] taxonomy.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, GrantType, TokenRecord},
	config::ProviderConfig,
	error::{ConfigError, TransientError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const TOKEN_ENDPOINT: &str = "token endpoint";

/// Error categories derived from a failed token request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenErrorKind {
	/// The grant was rejected (wrong password, expired or revoked refresh token).
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Failure is temporary and may be retried.
	Transient,
}

/// Primitive facts about a failed token request used for classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenErrorContext {
	/// Grant type associated with the failing request.
	pub grant: GrantType,
	/// HTTP status code, when available.
	pub http_status: Option<u16>,
	/// OAuth `error` field.
	pub oauth_error: Option<String>,
	/// OAuth `error_description` field.
	pub error_description: Option<String>,
}
impl TokenErrorContext {
	/// Creates a new context scoped to the provided grant type.
	pub fn new(grant: GrantType) -> Self {
		Self { grant, http_status: None, oauth_error: None, error_description: None }
	}

	/// Adds an HTTP status code.
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Classifies the failure: OAuth error codes first, then the HTTP status.
	pub fn classify(&self) -> TokenErrorKind {
		if let Some(kind) = self.oauth_error.as_deref().and_then(match_error_code) {
			return kind;
		}

		match self.http_status {
			Some(400) => TokenErrorKind::InvalidGrant,
			Some(401) => TokenErrorKind::InvalidClient,
			_ => TokenErrorKind::Transient,
		}
	}
}

/// Performs login and refresh grants for one [`ProviderConfig`].
pub struct TokenFacade {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
	credentials: Credentials,
}
impl TokenFacade {
	/// Builds the facade from the provider config and its shared transport.
	pub fn new(config: &ProviderConfig, http_client: ReqwestHttpClient) -> Result<Self> {
		let token_url = TokenUrl::from_url(config.token_endpoint()?);
		let credentials = config.credentials.clone();
		let mut oauth_client = BasicClient::new(ClientId::new(credentials.client_id().to_string()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		if let Some(secret) = credentials.client_secret().filter(|secret| !secret.is_empty()) {
			oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.expose().into()));
		}

		Ok(Self { oauth_client, http_client, credentials })
	}

	/// Logs in with the configured credentials.
	pub async fn login(&self) -> Result<TokenRecord> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.instrumented(meta.clone());
		let grant = self.credentials.grant();
		let response = match &self.credentials {
			Credentials::ClientCredentials { .. } =>
				self.oauth_client.exchange_client_credentials().request_async(&instrumented).await,
			Credentials::Password { username, password, .. } => {
				let username = ResourceOwnerUsername::new(username.clone());
				let password = ResourceOwnerPassword::new(password.expose().to_owned());

				self.oauth_client
					.exchange_password(&username, &password)
					.request_async(&instrumented)
					.await
			},
		}
		.map_err(|err| map_request_error(grant, meta.take(), err))?;

		map_token_response(response)
	}

	/// Exchanges a refresh token for a new record.
	pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord> {
		let meta = ResponseMetadataSlot::default();
		let instrumented = self.http_client.instrumented(meta.clone());
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_secret)
			.request_async(&instrumented)
			.await
			.map_err(|err| map_request_error(GrantType::RefreshToken, meta.take(), err))?;

		map_token_response(response)
	}
}
impl Debug for TokenFacade {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenFacade").field("credentials", &self.credentials).finish()
	}
}

fn map_token_response(response: BasicTokenResponse) -> Result<TokenRecord> {
	let expires_in = response.expires_in().ok_or(ConfigError::MissingExpiresIn)?.as_secs();
	let expires_in = i64::try_from(expires_in).map_err(|_| ConfigError::ExpiresInOutOfRange)?;

	if expires_in <= 0 {
		return Err(ConfigError::NonPositiveExpiresIn.into());
	}

	let mut builder = TokenRecord::builder()
		.access_token(response.access_token().secret().to_owned())
		.issued_at(OffsetDateTime::now_utc())
		.expires_in(Duration::seconds(expires_in));

	if let Some(refresh) = response.refresh_token() {
		builder = builder.refresh_token(refresh.secret().to_owned());
	}

	builder.build().map_err(|err| ConfigError::from(err).into())
}

fn map_request_error(
	grant: GrantType,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(grant, response, meta_ref),
		RequestTokenError::Request(error) => map_transport_error(meta_ref, error),
		RequestTokenError::Parse(error, _body) =>
			TransientError::TokenResponseParse { source: error, status: meta_status(meta_ref) }
				.into(),
		RequestTokenError::Other(message) => TransientError::TokenEndpoint {
			message,
			status: meta_status(meta_ref),
			retry_after: meta_retry_after(meta_ref),
		}
		.into(),
	}
}

fn map_server_response_error(
	grant: GrantType,
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> Error {
	let mut ctx = TokenErrorContext::new(grant).with_oauth_error(response.error().as_ref());

	if let Some(description) = response.error_description() {
		ctx = ctx.with_error_description(description.clone());
	}
	if let Some(status) = meta_status(meta) {
		ctx = ctx.with_http_status(status);
	}

	let reason = response
		.error_description()
		.cloned()
		.unwrap_or_else(|| response.error().as_ref().to_owned());

	match ctx.classify() {
		TokenErrorKind::InvalidGrant => Error::InvalidGrant { reason },
		TokenErrorKind::InvalidClient => Error::InvalidClient { reason },
		TokenErrorKind::Transient => TransientError::TokenEndpoint {
			message: reason,
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn map_transport_error(meta: Option<&ResponseMetadata>, err: HttpClientError<ReqwestError>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransientError::TokenEndpoint {
			message: format!("HTTP client error: {message}"),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
		_ => TransientError::TokenEndpoint {
			message: "HTTP client error".into(),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		}
		.into(),
	}
}

fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::TokenEndpoint {
			message: "request timed out".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::network(TOKEN_ENDPOINT, err).into()
}

fn match_error_code(value: &str) -> Option<TokenErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(TokenErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(TokenErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(TokenErrorKind::Transient)
	} else {
		None
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth_error_codes_win_over_status() {
		let ctx = TokenErrorContext::new(GrantType::RefreshToken)
			.with_http_status(401)
			.with_oauth_error("invalid_grant");

		assert_eq!(ctx.classify(), TokenErrorKind::InvalidGrant);

		let ctx = TokenErrorContext::new(GrantType::Password)
			.with_http_status(400)
			.with_oauth_error("unauthorized_client");

		assert_eq!(ctx.classify(), TokenErrorKind::InvalidClient);
	}

	#[test]
	fn status_fallback_covers_unknown_codes() {
		let ctx = TokenErrorContext::new(GrantType::ClientCredentials)
			.with_http_status(401)
			.with_oauth_error("unknown_error");

		assert_eq!(ctx.classify(), TokenErrorKind::InvalidClient);
		assert_eq!(
			TokenErrorContext::new(GrantType::Password).with_http_status(503).classify(),
			TokenErrorKind::Transient
		);
		assert_eq!(
			TokenErrorContext::new(GrantType::Password).with_http_status(400).classify(),
			TokenErrorKind::InvalidGrant
		);
	}
}
