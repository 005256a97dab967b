// self
use crate::obs::DecisionOutcome;

/// Records a decision via the global metrics recorder (when enabled).
pub fn record_decision(outcome: DecisionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("cas_proxy_policy_decision_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_decision_noop_without_recorder() {
		record_decision(DecisionOutcome::Error);
	}
}
