//! Observability helpers for upstream calls.
//!
//! - Every upstream call runs inside a span named `option_chain_proxy.upstream` carrying the
//!   `call` (endpoint kind) and `stage` (call site) fields.
//! - Enable the `metrics` feature to increment the `option_chain_proxy_upstream_total` counter
//!   for every attempt/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Upstream call kinds observed by the proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpstreamCall {
	/// Session acquisition against the upstream site root.
	Session,
	/// Option-chain data request.
	OptionChain,
	/// India VIX lookup through the primary data endpoint.
	Vix,
	/// India VIX lookup through the secondary chart source.
	VixFallback,
}
impl UpstreamCall {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			UpstreamCall::Session => "session",
			UpstreamCall::OptionChain => "option_chain",
			UpstreamCall::Vix => "vix",
			UpstreamCall::VixFallback => "vix_fallback",
		}
	}
}
impl Display for UpstreamCall {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to an upstream helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}

	/// Maps a finished call's result onto its outcome label.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure }
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
