//! India VIX lookup: the primary data endpoint first, the chart source as fallback.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	obs::{self, CallOutcome, CallSpan, UpstreamCall},
	upstream::{ChartPayload, DataFetcher, IndexPayload, records},
};

impl DataFetcher {
	/// Returns the India VIX level.
	///
	/// The primary lookup reads the index snapshot through the authenticated data endpoint,
	/// so an auth rejection still clears the credential store. Any primary failure falls back
	/// to the chart source, which needs no session; when both fail the fallback error is
	/// returned.
	pub async fn fetch_india_vix(&self) -> Result<f64> {
		match self.fetch_vix_primary().await {
			Ok(value) => Ok(value),
			Err(primary) => {
				tracing::warn!(error = %primary, "Primary VIX lookup failed; trying fallback.");

				self.fetch_vix_fallback().await.inspect_err(|fallback| {
					tracing::error!(error = %fallback, "Fallback VIX lookup failed.");
				})
			},
		}
	}

	async fn fetch_vix_primary(&self) -> Result<f64> {
		const CALL: UpstreamCall = UpstreamCall::Vix;

		let span = CallSpan::new(CALL, "fetch_vix_primary");

		obs::record_call_outcome(CALL, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let symbol = self.client().descriptor().vix_symbol.as_str();
				let body = self.fetch_authenticated(symbol).await?;

				Ok(records::decode::<IndexPayload>(&body)?.records.underlying_value)
			})
			.await;

		obs::record_call_outcome(CALL, CallOutcome::of(&result));

		result
	}

	async fn fetch_vix_fallback(&self) -> Result<f64> {
		const CALL: UpstreamCall = UpstreamCall::VixFallback;

		let span = CallSpan::new(CALL, "fetch_vix_fallback");

		obs::record_call_outcome(CALL, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.client().get_vix_fallback().await?;
				let status = response.status();
				let body = response.bytes().await.map_err(TransportError::from)?;

				if !status.is_success() {
					return Err(Error::Upstream {
						status: status.as_u16(),
						body: String::from_utf8_lossy(&body).into_owned(),
					});
				}

				records::decode::<ChartPayload>(&body)?.regular_market_price()
			})
			.await;

		obs::record_call_outcome(CALL, CallOutcome::of(&result));

		result
	}
}
