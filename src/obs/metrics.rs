// self
use crate::obs::{CallOutcome, UpstreamCall};

/// Records an upstream call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(call: UpstreamCall, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"option_chain_proxy_upstream_total",
			"call" => call.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (call, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_call_outcome_noop_without_recorder() {
		record_call_outcome(UpstreamCall::OptionChain, CallOutcome::Failure);
	}
}
