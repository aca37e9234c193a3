//! Option-chain reshaping: expiry parsing/formatting, the call/put selection rule, and the
//! outward row shape. Everything here is pure.

// crates.io
use time::{
	Date, format_description::BorrowedFormatItem, format_description::well_known::Rfc3339, macros,
};
// self
use crate::{
	_prelude::*,
	error::ValidationError,
	upstream::{OptionChainSnapshot, RawLeg, RawOptionRow},
};

const ISO_DATE: &[BorrowedFormatItem<'static>] =
	macros::format_description!("[year]-[month]-[day]");
const UPSTREAM_EXPIRY: &[BorrowedFormatItem<'static>] =
	macros::format_description!("[day]-[month repr:short]-[year]");

/// Target expiry requested by a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expiry(Date);
impl Expiry {
	/// Parses `YYYY-MM-DD`, or takes the calendar date of an RFC 3339 timestamp.
	pub fn parse(value: &str) -> Result<Self, ValidationError> {
		let value = value.trim();

		Date::parse(value, ISO_DATE)
			.or_else(|_| OffsetDateTime::parse(value, &Rfc3339).map(OffsetDateTime::date))
			.map(Self)
			.map_err(|_| ValidationError::InvalidExpiry { value: value.to_owned() })
	}

	/// Calendar date of the expiry.
	pub fn date(self) -> Date {
		self.0
	}

	/// Upstream spelling of the expiry, e.g. `25-Dec-2025`.
	pub fn upstream_label(self) -> String {
		// The format is static and every component is always representable.
		self.0.format(UPSTREAM_EXPIRY).unwrap_or_default()
	}
}
impl From<Date> for Expiry {
	fn from(date: Date) -> Self {
		Self(date)
	}
}

/// Side selected for a strike relative to the spot price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
	/// Strike strictly below the spot price.
	Call,
	/// Strike at or above the spot price.
	Put,
}
impl OptionType {
	/// Business rule: `Call` iff `strike_price < market_price`, otherwise `Put`.
	///
	/// This is a moneyness heuristic, not a contract-type distinction; it is kept as is.
	pub fn select(strike_price: f64, market_price: f64) -> Self {
		if strike_price < market_price { Self::Call } else { Self::Put }
	}
}

/// Quote fields of one leg in the outward shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LegQuote {
	/// Last traded price.
	#[serde(rename = "LTP")]
	pub ltp: f64,
	/// Open interest.
	#[serde(rename = "OI")]
	pub oi: f64,
	/// Traded volume.
	pub volume: f64,
	/// Change in open interest, when published upstream.
	#[serde(rename = "changeOI", default, skip_serializing_if = "Option::is_none")]
	pub change_oi: Option<f64>,
	/// Percentage change in open interest, when published upstream.
	#[serde(rename = "pchangeOI", default, skip_serializing_if = "Option::is_none")]
	pub pchange_oi: Option<f64>,
}
impl From<Option<&RawLeg>> for LegQuote {
	fn from(leg: Option<&RawLeg>) -> Self {
		match leg {
			Some(leg) => Self {
				ltp: leg.last_price,
				oi: leg.open_interest,
				volume: leg.total_traded_volume,
				change_oi: leg.change_in_open_interest,
				pchange_oi: leg.pchange_in_open_interest,
			},
			None => Self::default(),
		}
	}
}

/// One strike of the outward option chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRow {
	/// Strike price.
	pub strike_price: f64,
	/// Spot value of the underlying.
	pub market_price: f64,
	/// Side selected by [`OptionType::select`].
	pub option_type: OptionType,
	/// Call leg quote.
	pub call: LegQuote,
	/// Put leg quote.
	pub put: LegQuote,
}
impl OptionRow {
	/// Maps an upstream row against the underlying's spot value.
	pub fn from_raw(row: &RawOptionRow, market_price: f64) -> Self {
		Self {
			strike_price: row.strike_price,
			market_price,
			option_type: OptionType::select(row.strike_price, market_price),
			call: LegQuote::from(row.ce.as_ref()),
			put: LegQuote::from(row.pe.as_ref()),
		}
	}
}

/// Keeps the rows listed for `expiry` and maps each into the outward shape, preserving the
/// upstream order.
pub fn build_rows(rows: &[RawOptionRow], market_price: f64, expiry: Expiry) -> Vec<OptionRow> {
	let label = expiry.upstream_label();

	rows.iter()
		.filter(|row| row.expiry_date == label)
		.map(|row| OptionRow::from_raw(row, market_price))
		.collect()
}

/// [`build_rows`] over a fetched snapshot.
pub fn transform(snapshot: &OptionChainSnapshot, expiry: Expiry) -> Vec<OptionRow> {
	build_rows(&snapshot.rows, snapshot.underlying_value, expiry)
}
