//! Generic admin API client: token lifecycle, request plumbing, and error mapping.
//!
//! [`KeycloakClient`] attaches a bearer token to every admin request. An expired token is
//! refreshed before sending; a `401`/`403` answer triggers one re-authentication (refresh grant,
//! falling back to a fresh login) and exactly one retry of the request. Concurrent callers share
//! a single in-flight login through an async guard.

pub mod location;
pub mod server_info;

pub use location::*;
pub use server_info::*;

// crates.io
use reqwest::{
	Response,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION},
};
// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	config::ProviderConfig,
	error::{ApiError, ConfigError, TransportError},
	http::ReqwestHttpClient,
	oauth::TokenFacade,
	obs::{self, Operation, Outcome, RequestSpan},
};

const JSON: &str = "application/json";

/// Admin API client shared by every entity wrapper.
#[derive(Clone)]
pub struct KeycloakClient {
	config: Arc<ProviderConfig>,
	http_client: ReqwestHttpClient,
	tokens: Arc<TokenFacade>,
	token: Arc<RwLock<Option<TokenRecord>>>,
	login_guard: Arc<AsyncMutex<()>>,
	server_version: Arc<RwLock<Option<KeycloakVersion>>>,
}
impl KeycloakClient {
	/// Builds a client; logs in and reads the server version right away when
	/// [`ProviderConfig::initial_login`] is set.
	pub async fn new(config: ProviderConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Self::with_http_client(config, http_client).await
	}

	/// Builds a client on top of a caller-provided transport.
	pub async fn with_http_client(
		config: ProviderConfig,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		let tokens = TokenFacade::new(&config, http_client.clone())?;
		let client = Self {
			config: Arc::new(config),
			http_client,
			tokens: Arc::new(tokens),
			token: Default::default(),
			login_guard: Default::default(),
			server_version: Default::default(),
		};

		if client.config.initial_login {
			client.login().await?;
			client.server_version().await?;
		}

		Ok(client)
	}

	/// Returns the validated provider config.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Performs the login grant and replaces the cached token.
	pub async fn login(&self) -> Result<()> {
		let _guard = self.login_guard.lock().await;
		let record = self.fresh_login().await?;

		*self.token.write() = Some(record);

		Ok(())
	}

	/// Returns `true` once a token has been obtained.
	pub fn is_logged_in(&self) -> bool {
		self.token.read().is_some()
	}

	/// Returns the server version, fetching `/serverinfo` on first use.
	pub async fn server_version(&self) -> Result<KeycloakVersion> {
		if let Some(version) = *self.server_version.read() {
			return Ok(version);
		}

		let info: ServerInfo = self.get("/serverinfo").await?;
		let raw = info.system_info.version.as_str();
		let parsed = if self.config.red_hat_sso {
			KeycloakVersion::parse_red_hat_sso(raw)
		} else {
			KeycloakVersion::parse(raw)
		};
		let version = parsed?;

		*self.server_version.write() = Some(version);

		Ok(version)
	}

	/// Returns `true` if the server runs at least `version`.
	pub async fn version_is_at_least(&self, version: KeycloakVersion) -> Result<bool> {
		Ok(self.server_version().await?.is_at_least(version))
	}

	/// `GET`s `path` and decodes the JSON body.
	pub async fn get<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.get_query(path, &[]).await
	}

	/// `GET`s `path` with query parameters and decodes the JSON body.
	pub async fn get_query<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.execute(Method::GET, path, query, None).await?;

		decode(path, response).await
	}

	/// Like [`KeycloakClient::get`], mapping `404` to `None`.
	pub async fn get_optional<T>(&self, path: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		match self.get(path).await {
			Ok(value) => Ok(Some(value)),
			Err(err) if err.is_not_found() => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// `POST`s `body` and returns the created entity's ID from the `Location` header.
	pub async fn post<B>(&self, path: &str, body: &B) -> Result<String>
	where
		B: ?Sized + Serialize,
	{
		let body = encode(path, body)?;
		let response = self.execute(Method::POST, path, &[], Some(body)).await?;

		response
			.headers()
			.get(LOCATION)
			.and_then(|value| value.to_str().ok())
			.and_then(id_from_location)
			.map(ToOwned::to_owned)
			.ok_or_else(|| Error::MissingLocation { path: path.to_owned() })
	}

	/// `POST`s `body`, ignoring any response body or `Location` header.
	pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		let body = encode(path, body)?;

		self.execute(Method::POST, path, &[], Some(body)).await.map(drop)
	}

	/// `POST`s `body` and decodes the JSON response.
	pub async fn post_returning<B, T>(&self, path: &str, body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		let body = encode(path, body)?;
		let response = self.execute(Method::POST, path, &[], Some(body)).await?;

		decode(path, response).await
	}

	/// `PUT`s `body`.
	pub async fn put<B>(&self, path: &str, body: &B) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		let body = encode(path, body)?;

		self.execute(Method::PUT, path, &[], Some(body)).await.map(drop)
	}

	/// `PUT`s without a body (attach-style endpoints).
	pub async fn put_unit(&self, path: &str) -> Result<()> {
		self.execute(Method::PUT, path, &[], None).await.map(drop)
	}

	/// `DELETE`s `path`.
	pub async fn delete(&self, path: &str) -> Result<()> {
		self.execute(Method::DELETE, path, &[], None).await.map(drop)
	}

	/// `DELETE`s `path` with a JSON body (role-mapping removal endpoints).
	pub async fn delete_with_body<B>(&self, path: &str, body: &B) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		let body = encode(path, body)?;

		self.execute(Method::DELETE, path, &[], Some(body)).await.map(drop)
	}

	/// `DELETE`s `path`, repeating the call once if the first attempt fails.
	///
	/// Some delete endpoints fail intermittently with `5xx` while the server cleans up; the
	/// second attempt's result is returned.
	pub async fn delete_retrying_once(&self, path: &str) -> Result<()> {
		match self.delete(path).await {
			Ok(()) => Ok(()),
			Err(_err) => {
				obs::warn_event!(path, error = %_err, "delete failed, retrying once");
				obs::record_outcome(Operation::Admin, Outcome::Retry);

				self.delete(path).await
			},
		}
	}

	async fn execute(
		&self,
		method: Method,
		path: &str,
		query: &[(&str, &str)],
		body: Option<Vec<u8>>,
	) -> Result<Response> {
		const OPERATION: Operation = Operation::Admin;

		let span = RequestSpan::new(OPERATION, &method);

		obs::record_outcome(OPERATION, Outcome::Attempt);

		let result = span
			.instrument(async {
				let mut url = self.config.admin_url(path)?;

				if !query.is_empty() {
					url.query_pairs_mut().extend_pairs(query);
				}

				let token = self.access_token().await?;
				let response = self.send_once(&method, &url, path, body.as_deref(), &token).await?;

				if !matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
					return check_status(&method, path, response).await;
				}

				obs::debug_event!(
					path,
					status = response.status().as_u16(),
					"re-authenticating"
				);
				obs::record_outcome(OPERATION, Outcome::Retry);

				let token = self.reauthenticate(&token).await?;
				let response = self.send_once(&method, &url, path, body.as_deref(), &token).await?;

				check_status(&method, path, response).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_outcome(OPERATION, Outcome::Success),
			Err(_) => obs::record_outcome(OPERATION, Outcome::Failure),
		}

		result
	}

	async fn send_once(
		&self,
		method: &Method,
		url: &Url,
		path: &str,
		body: Option<&[u8]>,
		token: &TokenRecord,
	) -> Result<Response> {
		let mut request = self
			.http_client
			.request(method.clone(), url.clone())
			.header(AUTHORIZATION, token.bearer())
			.header(ACCEPT, JSON);

		for (name, value) in &self.config.additional_headers {
			request = request.header(name.as_str(), value.as_str());
		}
		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, JSON).body(body.to_vec());
		}

		request.send().await.map_err(|err| map_send_error(path, err))
	}

	/// Returns a usable token, logging in or refreshing when none is cached or it has expired.
	async fn access_token(&self) -> Result<TokenRecord> {
		let now = OffsetDateTime::now_utc();

		if let Some(record) = self.token.read().as_ref().filter(|record| !record.is_expired_at(now))
		{
			return Ok(record.clone());
		}

		let _guard = self.login_guard.lock().await;
		let current = self.token.read().clone();
		let record = match current {
			Some(record) if !record.is_expired_at(OffsetDateTime::now_utc()) => return Ok(record),
			Some(record) => self.refresh_or_login(&record).await?,
			None => self.fresh_login().await?,
		};

		*self.token.write() = Some(record.clone());

		Ok(record)
	}

	/// Replaces `stale` after the server rejected it, unless another caller already did.
	async fn reauthenticate(&self, stale: &TokenRecord) -> Result<TokenRecord> {
		let _guard = self.login_guard.lock().await;
		let current = self.token.read().clone();

		if let Some(record) = current.filter(|record| record.access_token != stale.access_token) {
			return Ok(record);
		}

		let record = self.refresh_or_login(stale).await?;

		*self.token.write() = Some(record.clone());

		Ok(record)
	}

	async fn refresh_or_login(&self, current: &TokenRecord) -> Result<TokenRecord> {
		const OPERATION: Operation = Operation::Refresh;

		let Some(refresh_token) = &current.refresh_token else {
			return self.fresh_login().await;
		};

		obs::record_outcome(OPERATION, Outcome::Attempt);

		match self.tokens.refresh(refresh_token.expose()).await {
			Ok(record) => {
				obs::record_outcome(OPERATION, Outcome::Success);

				Ok(record)
			},
			Err(Error::InvalidGrant { .. }) => {
				obs::debug_event!("refresh token rejected, logging in again");
				obs::record_outcome(OPERATION, Outcome::Failure);

				self.fresh_login().await
			},
			Err(err) => {
				obs::record_outcome(OPERATION, Outcome::Failure);

				Err(err)
			},
		}
	}

	async fn fresh_login(&self) -> Result<TokenRecord> {
		const OPERATION: Operation = Operation::Login;

		let span = RequestSpan::new(OPERATION, &Method::POST);

		obs::record_outcome(OPERATION, Outcome::Attempt);

		let result = span.instrument(self.tokens.login()).await;

		match &result {
			Ok(_) => obs::record_outcome(OPERATION, Outcome::Success),
			Err(_) => obs::record_outcome(OPERATION, Outcome::Failure),
		}

		result
	}
}
impl Debug for KeycloakClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("KeycloakClient")
			.field("url", &self.config.url.as_str())
			.field("realm", &self.config.realm)
			.field("logged_in", &self.is_logged_in())
			.finish()
	}
}

fn encode<B>(path: &str, body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body)
		.map_err(|source| ConfigError::SerializeBody { path: path.to_owned(), source }.into())
}

async fn decode<T>(path: &str, response: Response) -> Result<T>
where
	T: DeserializeOwned,
{
	let bytes = response.bytes().await.map_err(|err| map_send_error(path, err))?;
	let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(deserializer)
		.map_err(|source| Error::Decode { path: path.to_owned(), source })
}

async fn check_status(method: &Method, path: &str, response: Response) -> Result<Response> {
	let status = response.status();

	if status.is_success() {
		return Ok(response);
	}

	let body = response.text().await.unwrap_or_default();

	Err(ApiError { method: method.clone(), path: path.to_owned(), status, body }.into())
}

fn map_send_error(path: &str, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::network(path, err).into()
}
