//! Token record struct, expiry helpers, and builder.

// self
use crate::{_prelude::*, auth::Secret};

/// Errors produced by [`TokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenRecordBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Tokens issued by the login realm's token endpoint.
#[derive(Clone)]
pub struct TokenRecord {
	/// Bearer token attached to admin requests.
	pub access_token: Secret,
	/// Refresh token, if the grant issued one (client credentials usually does not).
	pub refresh_token: Option<Secret>,
	/// Instant the token response was received.
	pub issued_at: OffsetDateTime,
	/// Instant the access token stops being accepted.
	pub expires_at: OffsetDateTime,
}
impl TokenRecord {
	/// Returns a builder for constructing records.
	pub fn builder() -> TokenRecordBuilder {
		TokenRecordBuilder::default()
	}

	/// Returns `true` if the access token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the access token expires within `window` of `instant`.
	pub fn expires_within(&self, instant: OffsetDateTime, window: Duration) -> bool {
		self.expires_at - instant <= window
	}

	/// Formats the `Authorization` header value.
	pub(crate) fn bearer(&self) -> String {
		format!("Bearer {}", self.access_token.expose())
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`TokenRecord`].
#[derive(Clone, Debug, Default)]
pub struct TokenRecordBuilder {
	access_token: Option<Secret>,
	refresh_token: Option<Secret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl TokenRecordBuilder {
	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(Secret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(Secret::new(token));

		self
	}

	/// Consumes the builder and produces a [`TokenRecord`].
	pub fn build(self) -> Result<TokenRecord, TokenRecordBuilderError> {
		let access_token = self.access_token.ok_or(TokenRecordBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(TokenRecordBuilderError::MissingExpiry),
		};

		Ok(TokenRecord { access_token, refresh_token: self.refresh_token, issued_at, expires_at })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn builder_handles_relative_expiry() {
		let record = TokenRecord::builder()
			.access_token("access")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::minutes(5))
			.build()
			.expect("Token record builder should support relative expiry.");

		assert_eq!(record.expires_at, macros::datetime!(2025-01-01 00:05 UTC));
		assert!(!record.is_expired_at(macros::datetime!(2025-01-01 00:04 UTC)));
		assert!(record.is_expired_at(macros::datetime!(2025-01-01 00:05 UTC)));
		assert!(record.expires_within(macros::datetime!(2025-01-01 00:04 UTC), Duration::minutes(1)));
		assert_eq!(record.bearer(), "Bearer access");
	}

	#[test]
	fn builder_requires_token_and_expiry() {
		assert_eq!(
			TokenRecord::builder().expires_in(Duration::minutes(1)).build().unwrap_err(),
			TokenRecordBuilderError::MissingAccessToken
		);
		assert_eq!(
			TokenRecord::builder().access_token("a").build().unwrap_err(),
			TokenRecordBuilderError::MissingExpiry
		);
	}

	#[test]
	fn debug_redacts_tokens() {
		let record = TokenRecord::builder()
			.access_token("eyJhbGciOi")
			.refresh_token("eyJyZWZyZXNo")
			.expires_in(Duration::minutes(5))
			.build()
			.expect("Token record should build.");
		let rendered = format!("{record:?}");

		assert!(!rendered.contains("eyJ"));
	}
}
