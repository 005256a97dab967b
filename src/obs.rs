//! Optional observability helpers for verification calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit a `cas_proxy_policy.verify` span per call, an `error`
//!   event for each failure, and a `debug` event with the remote status.
//! - Enable `metrics` to increment the `cas_proxy_policy_decision_total` counter for every
//!   decision, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each verification call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionOutcome {
	/// Remote authority answered with a 2xx status.
	Allow,
	/// Remote authority answered with any other status.
	Deny,
	/// The call failed before a status was known; the policy denied.
	Error,
}
impl DecisionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DecisionOutcome::Allow => "allow",
			DecisionOutcome::Deny => "deny",
			DecisionOutcome::Error => "error",
		}
	}
}
impl Display for DecisionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
