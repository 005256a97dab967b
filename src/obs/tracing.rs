// self
use crate::_prelude::*;

/// Span wrapping a single verification call.
#[derive(Clone, Debug)]
pub struct VerifySpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl VerifySpan {
	/// Creates a span tagged with the endpoint and candidate callback.
	pub fn new(endpoint: &str, callback: &Url) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"cas_proxy_policy.verify",
				endpoint,
				pgt_url = callback.as_str(),
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (endpoint, callback);

			Self {}
		}
	}

	/// Enters the span for the duration of the blocking call.
	pub fn entered(self) -> VerifySpanGuard {
		#[cfg(feature = "tracing")]
		{
			VerifySpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			VerifySpanGuard {}
		}
	}
}

/// RAII guard returned by [`VerifySpan::entered`].
pub struct VerifySpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for VerifySpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("VerifySpanGuard(..)")
	}
}

/// Logs a failed verification together with its source chain.
pub fn log_failure(err: &Error) {
	#[cfg(feature = "tracing")]
	{
		let mut chain = Vec::new();
		let mut source = StdError::source(err);

		while let Some(cause) = source {
			chain.push(cause.to_string());

			source = cause.source();
		}

		tracing::error!(error = %err, causes = ?chain, "proxy callback verification failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = err;
	}
}

/// Logs the status returned by the verification endpoint.
pub fn log_status(status: u16, allowed: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(status, allowed, "verification endpoint answered");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, allowed);
	}
}
