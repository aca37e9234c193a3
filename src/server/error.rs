//! JSON error bodies and the status mapping applied at the HTTP boundary.

// crates.io
use axum::{
	Json,
	response::{IntoResponse, Response},
};
use serde_json::Value;
// self
use crate::{_prelude::*, error::AcquisitionError};

/// Error rendered as `{ "error": string, "details"?: any }` with a status code.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
	/// HTTP status returned to the caller.
	pub status: StatusCode,
	/// Human-readable message.
	pub message: String,
	/// Optional upstream payload echoed back to the caller.
	pub details: Option<Value>,
}
impl ApiError {
	/// Builds an error without details.
	pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into(), details: None }
	}

	/// Attaches upstream details.
	pub fn with_details(mut self, details: Value) -> Self {
		self.details = Some(details);

		self
	}

	/// Unrouted paths.
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND, "Not found.")
	}

	/// India VIX unavailable from every source.
	pub fn vix_unavailable() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch India VIX")
	}
}
impl From<Error> for ApiError {
	fn from(e: Error) -> Self {
		match e {
			Error::Validation(e) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
			Error::Acquisition(AcquisitionError::Transport(_)) => Self::new(
				StatusCode::GATEWAY_TIMEOUT,
				"No response from NSE while opening a session.",
			),
			Error::Acquisition(_) =>
				Self::new(StatusCode::SERVICE_UNAVAILABLE, "Failed to get NSE cookies."),
			Error::Unauthorized => Self::new(
				StatusCode::SERVICE_UNAVAILABLE,
				"NSE authentication expired. Please try again.",
			),
			Error::Upstream { status, body } => {
				let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
				let details = serde_json::from_str(&body).unwrap_or(Value::String(body));

				Self::new(status, "NSE API error").with_details(details)
			},
			Error::Transport(_) =>
				Self::new(StatusCode::GATEWAY_TIMEOUT, "No response from NSE API"),
			Error::MalformedResponse { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Invalid API response."),
			Error::Config(_) =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch data from NSE API"),
		}
	}
}
impl From<crate::error::ValidationError> for ApiError {
	fn from(e: crate::error::ValidationError) -> Self {
		Error::from(e).into()
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let mut body = serde_json::Map::new();

		body.insert("error".into(), Value::String(self.message));

		if let Some(details) = self.details {
			body.insert("details".into(), details);
		}

		(self.status, Json(Value::Object(body))).into_response()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::error::{TransportError, ValidationError};

	fn io_error() -> std::io::Error {
		std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline")
	}

	#[test]
	fn status_mapping_follows_error_taxonomy() {
		let cases = [
			(Error::from(ValidationError::MissingParameters), StatusCode::BAD_REQUEST),
			(Error::Unauthorized, StatusCode::SERVICE_UNAVAILABLE),
			(
				Error::from(AcquisitionError::MissingSessionHeaders),
				StatusCode::SERVICE_UNAVAILABLE,
			),
			(
				Error::from(AcquisitionError::Rejected { status: 401 }),
				StatusCode::SERVICE_UNAVAILABLE,
			),
			(
				Error::from(AcquisitionError::from(TransportError::timeout(io_error()))),
				StatusCode::GATEWAY_TIMEOUT,
			),
			(Error::from(TransportError::timeout(io_error())), StatusCode::GATEWAY_TIMEOUT),
			(Error::from(TransportError::unreachable(io_error())), StatusCode::GATEWAY_TIMEOUT),
			(Error::malformed(".", "expected value"), StatusCode::INTERNAL_SERVER_ERROR),
			(Error::Upstream { status: 429, body: String::new() }, StatusCode::TOO_MANY_REQUESTS),
		];

		for (error, status) in cases {
			assert_eq!(ApiError::from(error).status, status);
		}
	}

	#[test]
	fn missing_parameters_message_is_stable() {
		let api = ApiError::from(ValidationError::MissingParameters);

		assert_eq!(api.message, "Symbol and expiry date are required.");
		assert_eq!(api.details, None);
	}

	#[test]
	fn upstream_body_is_echoed_as_details() {
		let api = ApiError::from(Error::Upstream {
			status: 500,
			body: r#"{"message":"maintenance"}"#.into(),
		});

		assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(api.message, "NSE API error");
		assert_eq!(api.details, Some(json!({"message": "maintenance"})));

		let api = ApiError::from(Error::Upstream { status: 502, body: "Bad gateway".into() });

		assert_eq!(api.details, Some(Value::String("Bad gateway".into())));
	}
}
