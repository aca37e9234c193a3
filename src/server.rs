//! Inbound HTTP surface.
//!
//! - `GET /api/option-chain?symbol=..&expiry=YYYY-MM-DD` answers the rows listed for that
//!   expiry (`200 []` when none match).
//! - `GET /api/india-vix` answers `{ "vix": number }`.
//!
//! Every failure is converted into an [`ApiError`] JSON body at this boundary.

mod error;

pub use error::ApiError;

// crates.io
use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderValue, Method},
	routing::get,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
// self
use crate::{
	_prelude::*,
	chain::{self, Expiry, OptionRow},
	error::{ConfigError, ValidationError},
	upstream::DataFetcher,
};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
	fetcher: DataFetcher,
}
impl AppState {
	/// Wraps the fetcher serving every route.
	pub fn new(fetcher: DataFetcher) -> Self {
		Self { fetcher }
	}

	/// Fetcher serving every route.
	pub fn fetcher(&self) -> &DataFetcher {
		&self.fetcher
	}
}

/// Query string of `GET /api/option-chain`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OptionChainQuery {
	/// Underlying symbol, e.g. `NIFTY`.
	pub symbol: Option<String>,
	/// Target expiry as `YYYY-MM-DD`.
	pub expiry: Option<String>,
}
impl OptionChainQuery {
	/// Returns the trimmed symbol and the parsed expiry; empty values count as missing.
	pub fn validate(&self) -> Result<(&str, Expiry), ValidationError> {
		let (Some(symbol), Some(expiry)) = (non_empty(&self.symbol), non_empty(&self.expiry))
		else {
			return Err(ValidationError::MissingParameters);
		};

		Ok((symbol, Expiry::parse(expiry)?))
	}
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Body of `GET /api/india-vix`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VixResponse {
	/// India VIX level.
	pub vix: f64,
}

/// Builds the router without cross-origin handling.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api/option-chain", get(option_chain))
		.route("/api/india-vix", get(india_vix))
		.fallback(not_found)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Cross-origin policy for the frontend: one origin, GET/POST, credentials allowed.
pub fn cors(origin: &str) -> Result<CorsLayer, ConfigError> {
	let origin = HeaderValue::from_str(origin)
		.map_err(|_| ConfigError::InvalidCorsOrigin { origin: origin.to_owned() })?;

	Ok(CorsLayer::new()
		.allow_origin(origin)
		.allow_methods([Method::GET, Method::POST])
		.allow_credentials(true))
}

/// Serves `app` on `listener` until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, "Option-chain proxy listening.");
	}

	axum::serve(listener, app).await
}

async fn option_chain(
	State(state): State<AppState>,
	Query(query): Query<OptionChainQuery>,
) -> Result<Json<Vec<OptionRow>>, ApiError> {
	let (symbol, expiry) = query.validate()?;
	let snapshot = state.fetcher.fetch_option_chain(symbol).await?;
	let rows = chain::transform(&snapshot, expiry);

	tracing::debug!(
		symbol,
		expiry = %expiry.upstream_label(),
		rows = rows.len(),
		"Option chain served."
	);

	Ok(Json(rows))
}

async fn india_vix(State(state): State<AppState>) -> Result<Json<VixResponse>, ApiError> {
	state
		.fetcher
		.fetch_india_vix()
		.await
		.map(|vix| Json(VixResponse { vix }))
		.map_err(|_| ApiError::vix_unavailable())
}

async fn not_found() -> ApiError {
	ApiError::not_found()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn query(symbol: Option<&str>, expiry: Option<&str>) -> OptionChainQuery {
		OptionChainQuery { symbol: symbol.map(Into::into), expiry: expiry.map(Into::into) }
	}

	#[test]
	fn validation_requires_both_parameters() {
		for (symbol, expiry) in
			[(None, Some("2025-12-25")), (Some("NIFTY"), None), (Some("  "), Some("2025-12-25"))]
		{
			assert_eq!(query(symbol, expiry).validate(), Err(ValidationError::MissingParameters));
		}

		let query = query(Some(" NIFTY "), Some("2025-12-25"));
		let (symbol, expiry) = query.validate().expect("Complete query should validate.");

		assert_eq!(symbol, "NIFTY");
		assert_eq!(expiry.upstream_label(), "25-Dec-2025");
	}

	#[test]
	fn validation_rejects_unparseable_expiry() {
		assert!(matches!(
			query(Some("NIFTY"), Some("Christmas")).validate(),
			Err(ValidationError::InvalidExpiry { .. })
		));
	}

	#[test]
	fn cors_rejects_invalid_origins() {
		assert!(cors("https://optionchain.example.com").is_ok());
		assert!(matches!(
			cors("https://bad\norigin"),
			Err(ConfigError::InvalidCorsOrigin { .. })
		));
	}
}
