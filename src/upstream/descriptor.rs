//! Upstream descriptor data structures and the builder that validates them.

// self
use crate::{_prelude::*, error::ConfigError, session::SessionSecret};

/// Default upstream site root.
pub const DEFAULT_BASE_URL: &str = "https://www.nseindia.com/";
/// Default option-chain data path, relative to the base URL.
pub const DEFAULT_OPTION_CHAIN_PATH: &str = "api/option-chain-indices";
/// Default symbol whose underlying value is the India VIX.
pub const DEFAULT_VIX_SYMBOL: &str = "INDIAVIX";
/// Default secondary source for the India VIX.
pub const DEFAULT_VIX_FALLBACK_URL: &str =
	"https://query1.finance.yahoo.com/v8/finance/chart/%5EINDIAVIX";

/// How requests reach the upstream site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransportRoute {
	#[default]
	/// Call the upstream site directly.
	Direct,
	/// Hand each call to a forwarding service as `GET <endpoint>?api_key=..&url=<target>`.
	Relay {
		/// Forwarding service endpoint.
		endpoint: Url,
		/// API key presented to the forwarding service.
		api_key: SessionSecret,
	},
}

/// Endpoint set declared by an upstream descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamEndpoints {
	/// Site root hit to establish a session.
	pub session: Url,
	/// Option-chain data endpoint (the `symbol` query is appended per call).
	pub option_chain: Url,
	/// Secondary India VIX source queried without session cookies.
	pub vix_fallback: Url,
}

/// Immutable upstream descriptor consumed by the session provider and data fetcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamDescriptor {
	/// Endpoint definitions.
	pub endpoints: UpstreamEndpoints,
	/// Symbol queried for the India VIX.
	pub vix_symbol: String,
	/// Deadline applied to session and data calls.
	pub request_timeout: Duration,
	/// Deadline applied to the secondary VIX source.
	pub fallback_timeout: Duration,
	/// Maximum credential age before re-acquisition.
	pub credential_ttl: Duration,
	/// Transport hop used for session and data calls.
	pub route: TransportRoute,
}
impl UpstreamDescriptor {
	/// Default credential time-to-live.
	pub const DEFAULT_CREDENTIAL_TTL: Duration = Duration::minutes(30);
	/// Default deadline for session and data calls.
	pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(10);
	/// Default deadline for the secondary VIX source.
	pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::seconds(5);

	/// Creates a new builder rooted at the provided site URL.
	pub fn builder(base_url: Url) -> UpstreamDescriptorBuilder {
		UpstreamDescriptorBuilder::new(base_url)
	}

	/// Option-chain URL for `symbol`, with the symbol form-encoded into the query string.
	pub fn option_chain_url(&self, symbol: &str) -> Url {
		let mut url = self.endpoints.option_chain.clone();

		url.query_pairs_mut().append_pair("symbol", symbol);

		url
	}

	/// `Referer` value presented on data calls.
	pub fn referer(&self) -> &str {
		self.endpoints.session.as_str()
	}
}

/// Builder for [`UpstreamDescriptor`] values.
#[derive(Debug)]
pub struct UpstreamDescriptorBuilder {
	/// Upstream site root.
	pub base_url: Url,
	/// Option-chain data path, relative to the base URL.
	pub option_chain_path: String,
	/// Symbol queried for the India VIX.
	pub vix_symbol: String,
	/// Optional override for the secondary VIX source.
	pub vix_fallback_url: Option<Url>,
	/// Deadline applied to session and data calls.
	pub request_timeout: Duration,
	/// Deadline applied to the secondary VIX source.
	pub fallback_timeout: Duration,
	/// Maximum credential age before re-acquisition.
	pub credential_ttl: Duration,
	/// Transport hop used for session and data calls.
	pub route: TransportRoute,
}
impl UpstreamDescriptorBuilder {
	/// Creates a new builder seeded with defaults for everything but the site root.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			option_chain_path: DEFAULT_OPTION_CHAIN_PATH.into(),
			vix_symbol: DEFAULT_VIX_SYMBOL.into(),
			vix_fallback_url: None,
			request_timeout: UpstreamDescriptor::DEFAULT_REQUEST_TIMEOUT,
			fallback_timeout: UpstreamDescriptor::DEFAULT_FALLBACK_TIMEOUT,
			credential_ttl: UpstreamDescriptor::DEFAULT_CREDENTIAL_TTL,
			route: TransportRoute::Direct,
		}
	}

	/// Overrides the option-chain data path.
	pub fn option_chain_path(mut self, path: impl Into<String>) -> Self {
		self.option_chain_path = path.into();

		self
	}

	/// Overrides the India VIX symbol.
	pub fn vix_symbol(mut self, symbol: impl Into<String>) -> Self {
		self.vix_symbol = symbol.into();

		self
	}

	/// Overrides the secondary India VIX source.
	pub fn vix_fallback_url(mut self, url: Url) -> Self {
		self.vix_fallback_url = Some(url);

		self
	}

	/// Overrides the deadline for session and data calls.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the deadline for the secondary VIX source.
	pub fn fallback_timeout(mut self, timeout: Duration) -> Self {
		self.fallback_timeout = timeout;

		self
	}

	/// Overrides the credential time-to-live.
	pub fn credential_ttl(mut self, ttl: Duration) -> Self {
		self.credential_ttl = ttl;

		self
	}

	/// Routes session and data calls through a forwarding service.
	pub fn relay(mut self, endpoint: Url, api_key: impl Into<String>) -> Self {
		self.route = TransportRoute::Relay { endpoint, api_key: SessionSecret::new(api_key) };

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<UpstreamDescriptor, ConfigError> {
		validate_scheme("upstream base", &self.base_url)?;

		let option_chain = self
			.base_url
			.join(&self.option_chain_path)
			.map_err(|source| ConfigError::InvalidUrl { name: "option-chain", source })?;
		let vix_fallback = match self.vix_fallback_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_VIX_FALLBACK_URL)
				.map_err(|source| ConfigError::InvalidUrl { name: "VIX fallback", source })?,
		};

		validate_scheme("VIX fallback", &vix_fallback)?;

		if let TransportRoute::Relay { endpoint, .. } = &self.route {
			validate_scheme("relay", endpoint)?;
		}

		validate_duration("request timeout", self.request_timeout)?;
		validate_duration("fallback timeout", self.fallback_timeout)?;
		validate_duration("credential TTL", self.credential_ttl)?;

		Ok(UpstreamDescriptor {
			endpoints: UpstreamEndpoints { session: self.base_url, option_chain, vix_fallback },
			vix_symbol: self.vix_symbol,
			request_timeout: self.request_timeout,
			fallback_timeout: self.fallback_timeout,
			credential_ttl: self.credential_ttl,
			route: self.route,
		})
	}
}

fn validate_scheme(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { name, url: url.to_string() }),
	}
}

fn validate_duration(name: &'static str, value: Duration) -> Result<(), ConfigError> {
	if value.is_positive() { Ok(()) } else { Err(ConfigError::NonPositiveDuration { name }) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse descriptor test URL.")
	}

	#[test]
	fn defaults_target_the_upstream_site() {
		let descriptor = UpstreamDescriptor::builder(url(DEFAULT_BASE_URL))
			.build()
			.expect("Default descriptor should build.");

		assert_eq!(descriptor.endpoints.session.as_str(), "https://www.nseindia.com/");
		assert_eq!(
			descriptor.endpoints.option_chain.as_str(),
			"https://www.nseindia.com/api/option-chain-indices"
		);
		assert_eq!(descriptor.endpoints.vix_fallback.as_str(), DEFAULT_VIX_FALLBACK_URL);
		assert_eq!(descriptor.vix_symbol, "INDIAVIX");
		assert_eq!(descriptor.credential_ttl, Duration::minutes(30));
		assert_eq!(descriptor.request_timeout, Duration::seconds(10));
		assert_eq!(descriptor.fallback_timeout, Duration::seconds(5));
		assert_eq!(descriptor.route, TransportRoute::Direct);
		assert_eq!(descriptor.referer(), "https://www.nseindia.com/");
	}

	#[test]
	fn option_chain_url_encodes_symbol() {
		let descriptor = UpstreamDescriptor::builder(url(DEFAULT_BASE_URL))
			.build()
			.expect("Default descriptor should build.");

		assert_eq!(
			descriptor.option_chain_url("NIFTY").as_str(),
			"https://www.nseindia.com/api/option-chain-indices?symbol=NIFTY"
		);
		assert_eq!(
			descriptor.option_chain_url("M&M FIN").as_str(),
			"https://www.nseindia.com/api/option-chain-indices?symbol=M%26M+FIN"
		);
	}

	#[test]
	fn builder_rejects_bad_schemes_and_durations() {
		let err = UpstreamDescriptor::builder(url("ftp://example.com/"))
			.build()
			.expect_err("Non-HTTP base URLs should be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { name: "upstream base", .. }));

		let err = UpstreamDescriptor::builder(url("https://example.com/"))
			.relay(url("file:///tmp/relay"), "key")
			.build()
			.expect_err("Non-HTTP relay endpoints should be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { name: "relay", .. }));

		let err = UpstreamDescriptor::builder(url("https://example.com/"))
			.credential_ttl(Duration::ZERO)
			.build()
			.expect_err("A zero TTL should be rejected.");

		assert!(matches!(err, ConfigError::NonPositiveDuration { name: "credential TTL" }));
	}

	#[test]
	fn relay_route_keeps_key_redacted() {
		let descriptor = UpstreamDescriptor::builder(url("https://example.com/"))
			.relay(url("https://relay.example.com/"), "relay-key")
			.build()
			.expect("Relay descriptor should build.");

		assert!(!format!("{descriptor:?}").contains("relay-key"));

		match descriptor.route {
			TransportRoute::Relay { endpoint, api_key } => {
				assert_eq!(endpoint.as_str(), "https://relay.example.com/");
				assert_eq!(api_key.expose(), "relay-key");
			},
			TransportRoute::Direct => panic!("Relay route should be configured."),
		}
	}
}
