//! Upstream payload shapes and the decoder that maps shape mismatches into
//! [`Error::MalformedResponse`].

// crates.io
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::_prelude::*;

/// Option-chain response: `{ records: { data: [...], underlyingValue: number } }`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct OptionChainPayload {
	/// Record envelope.
	pub records: OptionChainRecords,
}

/// Record envelope of an option-chain response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainRecords {
	/// One row per strike and expiry.
	pub data: Vec<RawOptionRow>,
	/// Spot value of the underlying.
	#[serde(deserialize_with = "lenient_f64")]
	pub underlying_value: f64,
}

/// Upstream row for a single strike/expiry pair.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptionRow {
	/// Strike price.
	pub strike_price: f64,
	/// Expiry formatted as `DD-Mon-YYYY`.
	pub expiry_date: String,
	/// Call leg, absent when no call is listed at this strike.
	#[serde(rename = "CE", default)]
	pub ce: Option<RawLeg>,
	/// Put leg, absent when no put is listed at this strike.
	#[serde(rename = "PE", default)]
	pub pe: Option<RawLeg>,
}

/// Quote fields of one option leg; absent numbers read as zero.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
	/// Last traded price.
	#[serde(default)]
	pub last_price: f64,
	/// Open interest.
	#[serde(default)]
	pub open_interest: f64,
	/// Traded volume for the session.
	#[serde(default)]
	pub total_traded_volume: f64,
	/// Change in open interest, when published.
	#[serde(rename = "changeinOpenInterest", default)]
	pub change_in_open_interest: Option<f64>,
	/// Percentage change in open interest, when published.
	#[serde(rename = "pchangeinOpenInterest", default)]
	pub pchange_in_open_interest: Option<f64>,
}

/// Decoded option-chain data handed to the transformer.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionChainSnapshot {
	/// Raw rows across every listed expiry.
	pub rows: Vec<RawOptionRow>,
	/// Spot value of the underlying.
	pub underlying_value: f64,
}
impl From<OptionChainPayload> for OptionChainSnapshot {
	fn from(payload: OptionChainPayload) -> Self {
		Self { rows: payload.records.data, underlying_value: payload.records.underlying_value }
	}
}

/// Index snapshot response; only the underlying value is read.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IndexPayload {
	/// Record envelope.
	pub records: IndexRecords,
}

/// Record envelope of an index snapshot.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecords {
	/// Index level.
	#[serde(deserialize_with = "lenient_f64")]
	pub underlying_value: f64,
}

/// Chart response of the secondary VIX source.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChartPayload {
	/// Chart envelope.
	pub chart: Chart,
}
impl ChartPayload {
	/// Regular market price of the first chart result.
	pub fn regular_market_price(&self) -> Result<f64> {
		self.chart
			.result
			.first()
			.map(|result| result.meta.regular_market_price)
			.ok_or_else(|| Error::malformed("chart.result", "expected at least one result"))
	}
}

/// Chart envelope.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Chart {
	/// Result series; the first one is used.
	pub result: Vec<ChartResult>,
}

/// One chart series.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChartResult {
	/// Series metadata.
	pub meta: ChartMeta,
}

/// Chart series metadata.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
	/// Latest regular-session price.
	#[serde(deserialize_with = "lenient_f64")]
	pub regular_market_price: f64,
}

/// Decodes a JSON body, reporting the failing path on mismatch.
pub fn decode<T>(body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	Ok(serde_path_to_error::deserialize(&mut de)?)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum NumberOrText {
		Number(f64),
		Text(String),
	}

	match NumberOrText::deserialize(deserializer)? {
		NumberOrText::Number(value) => Ok(value),
		NumberOrText::Text(text) => text
			.trim()
			.parse()
			.map_err(|_| serde::de::Error::custom(format!("`{text}` is not a number"))),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn option_chain_payload_reads_legs_and_nulls() {
		let body = br#"{
			"records": {
				"underlyingValue": 110,
				"expiryDates": ["25-Dec-2025"],
				"data": [
					{
						"strikePrice": 100,
						"expiryDate": "25-Dec-2025",
						"CE": {"lastPrice": 5, "openInterest": 10, "totalTradedVolume": 2,
							"changeinOpenInterest": -3, "pchangeinOpenInterest": -23.08},
						"PE": null
					},
					{"strikePrice": 120, "expiryDate": "01-Jan-2026"}
				]
			}
		}"#;
		let snapshot = OptionChainSnapshot::from(
			decode::<OptionChainPayload>(body).expect("Option-chain fixture should decode."),
		);

		assert_eq!(snapshot.underlying_value, 110.0);
		assert_eq!(snapshot.rows.len(), 2);

		let first = &snapshot.rows[0];
		let ce = first.ce.as_ref().expect("Call leg should be present.");

		assert_eq!(ce.last_price, 5.0);
		assert_eq!(ce.change_in_open_interest, Some(-3.0));
		assert_eq!(ce.pchange_in_open_interest, Some(-23.08));
		assert!(first.pe.is_none());
		assert!(snapshot.rows[1].ce.is_none());
	}

	#[test]
	fn missing_data_is_malformed() {
		let err = decode::<OptionChainPayload>(br#"{"records":{"underlyingValue":1}}"#)
			.expect_err("Records without data should be rejected.");

		assert!(matches!(err, Error::MalformedResponse { ref path, .. } if path == "records"));

		let err = decode::<OptionChainPayload>(br#"{}"#)
			.expect_err("Payload without records should be rejected.");

		assert!(matches!(err, Error::MalformedResponse { .. }));

		let err = decode::<OptionChainPayload>(b"<html>denied</html>")
			.expect_err("Non-JSON bodies should be rejected.");

		assert!(matches!(err, Error::MalformedResponse { .. }));
	}

	#[test]
	fn index_value_accepts_numeric_text() {
		let payload = decode::<IndexPayload>(br#"{"records":{"underlyingValue":"13.45"}}"#)
			.expect("Numeric text should decode.");

		assert_eq!(payload.records.underlying_value, 13.45);

		let err = decode::<IndexPayload>(br#"{"records":{"underlyingValue":"n/a"}}"#)
			.expect_err("Non-numeric text should be rejected.");

		assert!(matches!(
			err,
			Error::MalformedResponse { ref path, .. } if path == "records.underlyingValue"
		));
	}

	#[test]
	fn chart_requires_a_result() {
		let payload = decode::<ChartPayload>(
			br#"{"chart":{"result":[{"meta":{"regularMarketPrice":14.2}}],"error":null}}"#,
		)
		.expect("Chart fixture should decode.");

		assert_eq!(payload.regular_market_price().expect("Price should be present."), 14.2);

		let empty = decode::<ChartPayload>(br#"{"chart":{"result":[]}}"#)
			.expect("Empty chart should still decode.");

		assert!(matches!(
			empty.regular_market_price(),
			Err(Error::MalformedResponse { ref path, .. }) if path == "chart.result"
		));
	}
}
