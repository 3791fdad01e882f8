// self
use crate::{_prelude::*, http::Method, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// Span covering one API call, from first dispatch to its final outcome.
///
/// Carries the request line (`method`, `path`) up front; `retried` and `status` are filled in
/// as the call progresses.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Opens a span for a request of `kind` sent as `method path`.
	pub fn new(kind: CallKind, method: Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			// Endpoint only; query strings vary per page.
			let path = path.split('?').next().unwrap_or_default();
			let span = tracing::info_span!(
				"gallery_client.call",
				call = kind.as_str(),
				method = method.as_str(),
				path,
				retried = false,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, method, path);

			Self {}
		}
	}

	/// Marks the call as replayed after a token refresh.
	pub fn record_retry(&self) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("retried", true);
		}
	}

	/// Records the final HTTP status; failures without a response leave the field empty.
	pub fn record_status(&self, status: Option<u16>) {
		#[cfg(feature = "tracing")]
		{
			if let Some(status) = status {
				self.span.record("status", status);
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_passes_the_output_through() {
		let span = CallSpan::new(CallKind::Request, Method::Get, "/photos?page=2");

		span.record_retry();
		span.record_status(Some(200));

		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
