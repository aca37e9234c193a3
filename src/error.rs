//! Proxy-level error types shared across the session, upstream, and server layers.

// self
use crate::_prelude::*;

/// Proxy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical proxy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Inbound request is missing or carries malformed parameters.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Session credential could not be obtained from the upstream site.
	#[error(transparent)]
	Acquisition(#[from] AcquisitionError),
	/// Transport failure (timeout, DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Upstream rejected the session credential; the store has been cleared.
	#[error("Upstream rejected the session credential.")]
	Unauthorized,
	/// Upstream answered with a non-success status other than an auth rejection.
	#[error("Upstream returned HTTP {status}.")]
	Upstream {
		/// HTTP status code returned by the upstream endpoint.
		status: u16,
		/// Raw response body, lossily decoded as UTF-8.
		body: String,
	},
	/// Upstream answered successfully with a body of an unexpected shape.
	#[error("Upstream returned a malformed payload at `{path}`: {reason}.")]
	MalformedResponse {
		/// JSON path of the offending value (`.` for the document root).
		path: String,
		/// Parser or shape-check message.
		reason: String,
	},
}
impl Error {
	/// Builds a [`Error::MalformedResponse`] for a shape check that passed parsing.
	pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::MalformedResponse { path: path.into(), reason: reason.into() }
	}

	/// Whether re-issuing the same request may succeed without any local change.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Unauthorized | Self::Transport(_) | Self::Acquisition(_))
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::malformed(e.path().to_string(), e.inner().to_string())
	}
}

/// Inbound request validation failures.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// `symbol` or `expiry` was absent or empty.
	#[error("Symbol and expiry date are required.")]
	MissingParameters,
	/// `expiry` is neither a `YYYY-MM-DD` date nor an RFC 3339 timestamp.
	#[error("Expiry date `{value}` is not an ISO-8601 date.")]
	InvalidExpiry {
		/// Raw value supplied by the caller.
		value: String,
	},
}

/// Failures raised while establishing an upstream session.
#[derive(Debug, ThisError)]
pub enum AcquisitionError {
	/// The identity endpoint could not be reached.
	#[error("Session endpoint is unreachable.")]
	Transport(#[source] TransportError),
	/// The identity endpoint answered with a non-success status.
	#[error("Session endpoint returned HTTP {status}.")]
	Rejected {
		/// HTTP status code returned by the identity endpoint.
		status: u16,
	},
	/// The identity endpoint answered without any `Set-Cookie` header.
	#[error("Session endpoint did not issue any session cookies.")]
	MissingSessionHeaders,
}
impl From<TransportError> for AcquisitionError {
	fn from(e: TransportError) -> Self {
		Self::Transport(e)
	}
}

/// Configuration and validation failures raised while wiring the proxy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured URL cannot be parsed.
	#[error("Configured {name} URL is invalid.")]
	InvalidUrl {
		/// Which setting failed validation.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured URL uses a scheme other than HTTP(S).
	#[error("The {name} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which setting failed validation.
		name: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// Relay endpoint and API key must be configured together.
	#[error("Relay transport requires both an endpoint and an API key.")]
	IncompleteRelay,
	/// A configured duration is zero or negative.
	#[error("The {name} duration must be positive.")]
	NonPositiveDuration {
		/// Which setting failed validation.
		name: &'static str,
	},
	/// The CORS origin is not a valid header value.
	#[error("CORS origin `{origin}` is not a valid header value.")]
	InvalidCorsOrigin {
		/// Rejected origin string.
		origin: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (no usable response was received).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The request exceeded its deadline.
	#[error("Upstream request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// The request could not be delivered or its response could not be read.
	#[error("Upstream is unreachable.")]
	Unreachable {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn unreachable(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Unreachable { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::unreachable(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn validation_messages_match_http_contract() {
		assert_eq!(
			ValidationError::MissingParameters.to_string(),
			"Symbol and expiry date are required."
		);
		assert!(
			ValidationError::InvalidExpiry { value: "soon".into() }.to_string().contains("soon")
		);
	}

	#[test]
	fn acquisition_transport_keeps_source() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let err: Error = AcquisitionError::from(TransportError::unreachable(io)).into();
		let source =
			StdError::source(&err).expect("Acquisition error should expose the transport failure.");

		assert_eq!(source.to_string(), "Upstream is unreachable.");
		assert!(err.is_retryable());
	}

	#[test]
	fn upstream_and_validation_errors_are_not_retryable() {
		assert!(!Error::Upstream { status: 500, body: String::new() }.is_retryable());
		assert!(!Error::from(ValidationError::MissingParameters).is_retryable());
		assert!(Error::Unauthorized.is_retryable());
	}

	#[test]
	fn decode_failures_name_the_json_path() {
		#[derive(Debug, Deserialize)]
		struct Payload {
			#[allow(dead_code)]
			records: Records,
		}
		#[derive(Debug, Deserialize)]
		struct Records {
			#[allow(dead_code)]
			data: Vec<u8>,
		}

		let body = br#"{"records":{"timestamp":"25-Dec-2025"}}"#;
		let err: Error = serde_path_to_error::deserialize::<_, Payload>(
			&mut serde_json::Deserializer::from_slice(body),
		)
		.expect_err("Payload without records.data should fail to decode.")
		.into();

		match err {
			Error::MalformedResponse { path, reason } => {
				assert_eq!(path, "records");
				assert!(reason.contains("data"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
