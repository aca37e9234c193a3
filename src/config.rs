//! Command line and environment configuration.

// std
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	server::{self, AppState},
	session::{CredentialProvider, CredentialStore},
	upstream::{
		DEFAULT_BASE_URL, DEFAULT_VIX_FALLBACK_URL, DataFetcher, UpstreamClient,
		UpstreamDescriptor,
	},
};

/// Runtime settings; every flag falls back to an environment variable, then a default.
#[derive(Clone, Debug, Parser)]
#[command(name = "option-chain-proxy", version, about, long_about = None)]
pub struct Config {
	/// Address to bind.
	#[arg(long, env = "PROXY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
	pub host: IpAddr,
	/// Port to bind.
	#[arg(long, env = "PORT", default_value_t = 3000)]
	pub port: u16,
	/// Upstream site root; session cookies are minted here.
	#[arg(long, env = "UPSTREAM_BASE_URL", default_value = DEFAULT_BASE_URL)]
	pub upstream_base_url: String,
	/// Secondary India VIX source.
	#[arg(long, env = "VIX_FALLBACK_URL", default_value = DEFAULT_VIX_FALLBACK_URL)]
	pub vix_fallback_url: String,
	/// Frontend origin allowed by CORS.
	#[arg(long, env = "CORS_ORIGIN", default_value = "https://optionchain-jtbl.onrender.com")]
	pub cors_origin: String,
	/// Maximum session credential age, in seconds.
	#[arg(long, env = "CREDENTIAL_TTL_SECS", default_value_t = 1_800)]
	pub credential_ttl_secs: u32,
	/// Deadline for session and data calls, in seconds.
	#[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
	pub request_timeout_secs: u32,
	/// Deadline for the secondary India VIX source, in seconds.
	#[arg(long, env = "FALLBACK_TIMEOUT_SECS", default_value_t = 5)]
	pub fallback_timeout_secs: u32,
	/// Forwarding service that relays upstream calls.
	#[arg(long, env = "RELAY_URL")]
	pub relay_url: Option<String>,
	/// API key presented to the forwarding service.
	#[arg(long, env = "RELAY_API_KEY", hide_env_values = true)]
	pub relay_api_key: Option<String>,
}
impl Config {
	/// Socket address to bind.
	pub fn bind_addr(&self) -> SocketAddr {
		SocketAddr::new(self.host, self.port)
	}

	/// Validated upstream descriptor.
	pub fn upstream_descriptor(&self) -> Result<UpstreamDescriptor, ConfigError> {
		let base = parse_url("upstream base", &self.upstream_base_url)?;
		let fallback = parse_url("VIX fallback", &self.vix_fallback_url)?;
		let mut builder = UpstreamDescriptor::builder(base)
			.vix_fallback_url(fallback)
			.credential_ttl(Duration::seconds(self.credential_ttl_secs.into()))
			.request_timeout(Duration::seconds(self.request_timeout_secs.into()))
			.fallback_timeout(Duration::seconds(self.fallback_timeout_secs.into()));

		match (self.relay_url.as_deref(), self.relay_api_key.as_deref()) {
			(Some(endpoint), Some(api_key)) =>
				builder = builder.relay(parse_url("relay", endpoint)?, api_key),
			(None, None) => {},
			_ => return Err(ConfigError::IncompleteRelay),
		}

		builder.build()
	}

	/// Wires the session store, provider, fetcher, and router state.
	pub fn app_state(&self) -> Result<AppState, ConfigError> {
		let client = UpstreamClient::new(self.upstream_descriptor()?)?;
		let provider = CredentialProvider::new(client.clone(), CredentialStore::default());

		Ok(AppState::new(DataFetcher::new(client, provider)))
	}

	/// Full application router, including the CORS policy.
	pub fn app(&self) -> Result<axum::Router, ConfigError> {
		Ok(server::router(self.app_state()?).layer(server::cors(&self.cors_origin)?))
	}
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })
}
