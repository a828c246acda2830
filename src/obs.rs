//! Optional observability helpers for admin requests and token exchanges.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `keycloak_provider.request` with the `operation` and
//!   `method` fields, plus `debug`/`warn` events around re-authentication and retries.
//! - Enable `metrics` to increment the `keycloak_provider_request_total` counter for every
//!   attempt/success/failure/retry, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Initial login grant.
	Login,
	/// Refresh-token grant (or its login fallback).
	Refresh,
	/// Admin API request.
	Admin,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Login => "login",
			Operation::Refresh => "refresh",
			Operation::Admin => "admin",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Request re-sent after re-authentication.
	Retry,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
			Outcome::Retry => "retry",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
