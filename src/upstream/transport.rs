//! HTTP transport for upstream calls.
//!
//! [`UpstreamClient`] owns the reqwest client and the descriptor, attaches the browser-like
//! request signature the upstream site expects, and applies the configured
//! [`TransportRoute`]. It never interprets response statuses; classification belongs to the
//! session provider and the data fetcher.

// crates.io
use reqwest::{
	RequestBuilder, Response,
	header::{ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	session::Credential,
	upstream::{TransportRoute, UpstreamDescriptor},
};

/// Desktop browser user agent presented to the upstream site.
pub const BROWSER_USER_AGENT: &str = concat!(
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
	"AppleWebKit/537.36 (KHTML, like Gecko) ",
	"Chrome/91.0.4472.124 Safari/537.36",
);
/// `Accept-Language` value presented to the upstream site.
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Shared upstream HTTP client; clones reuse the same connection pool and descriptor.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
	http: ReqwestClient,
	descriptor: Arc<UpstreamDescriptor>,
}
impl UpstreamClient {
	/// Builds a client with a fresh reqwest connection pool.
	pub fn new(descriptor: UpstreamDescriptor) -> Result<Self, ConfigError> {
		let http = ReqwestClient::builder().build()?;

		Ok(Self::with_client(http, descriptor))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(http: ReqwestClient, descriptor: UpstreamDescriptor) -> Self {
		Self { http, descriptor: Arc::new(descriptor) }
	}

	/// Descriptor driving every call made by this client.
	pub fn descriptor(&self) -> &UpstreamDescriptor {
		&self.descriptor
	}

	/// Requests the site root so the upstream issues fresh session cookies.
	pub(crate) async fn open_session(&self) -> Result<Response, TransportError> {
		let target = self.descriptor.endpoints.session.clone();

		self.routed(target, self.descriptor.request_timeout).send().await.map_err(Into::into)
	}

	/// Requests the data endpoint for `symbol`, presenting `credential` as the cookie jar.
	pub(crate) async fn get_option_chain(
		&self,
		symbol: &str,
		credential: &Credential,
	) -> Result<Response, TransportError> {
		let target = self.descriptor.option_chain_url(symbol);

		self.routed(target, self.descriptor.request_timeout)
			.header(REFERER, self.descriptor.referer())
			.header(COOKIE, credential.cookie_header())
			.send()
			.await
			.map_err(Into::into)
	}

	/// Requests the secondary VIX source directly, without session cookies.
	pub(crate) async fn get_vix_fallback(&self) -> Result<Response, TransportError> {
		self.http
			.get(self.descriptor.endpoints.vix_fallback.clone())
			.timeout(self.descriptor.fallback_timeout.unsigned_abs())
			.send()
			.await
			.map_err(Into::into)
	}

	fn routed(&self, target: Url, timeout: Duration) -> RequestBuilder {
		let builder = match &self.descriptor.route {
			TransportRoute::Direct => self.http.get(target),
			TransportRoute::Relay { endpoint, api_key } => self
				.http
				.get(endpoint.clone())
				.query(&[("api_key", api_key.expose()), ("url", target.as_str())]),
		};

		builder
			.timeout(timeout.unsigned_abs())
			.header(USER_AGENT, BROWSER_USER_AGENT)
			.header(ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE)
	}
}
