// self
use crate::{_prelude::*, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// Span wrapping one client operation.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the operation and HTTP method.
	pub fn new(operation: Operation, method: &Method) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"keycloak_provider.request",
				operation = operation.as_str(),
				method = method.as_str()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, method);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `debug` event when tracing is enabled.
macro_rules! debug_event {
	($($arg:tt)*) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::debug!($($arg)*);
		}
	};
}
/// Emits a `warn` event when tracing is enabled.
macro_rules! warn_event {
	($($arg:tt)*) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::warn!($($arg)*);
		}
	};
}
pub(crate) use {debug_event, warn_event};

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::new(Operation::Admin, &Method::GET);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
