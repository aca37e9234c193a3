//! Session-aware options-chain proxy: keep an upstream session cookie warm, fetch option-chain
//! records through it, reshape them, and serve JSON to a frontend.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]
#![cfg_attr(test, allow(unused_crate_dependencies))]

pub mod chain;
pub mod config;
pub mod error;
pub mod obs;
pub mod server;
pub mod session;
pub mod upstream;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		server::AppState,
		session::{CredentialProvider, CredentialStore},
		upstream::{DataFetcher, UpstreamClient, UpstreamDescriptor},
	};

	/// Builds an upstream descriptor pointing every endpoint at `base` (typically an
	/// `httpmock` server URL), with the VIX fallback served from `<base>/chart/vix`.
	pub fn test_descriptor(base: &str) -> UpstreamDescriptor {
		let base = Url::parse(base).expect("Mock upstream base URL should parse.");
		let fallback = base.join("chart/vix").expect("Mock fallback URL should join.");

		UpstreamDescriptor::builder(base)
			.vix_fallback_url(fallback)
			.request_timeout(Duration::seconds(2))
			.fallback_timeout(Duration::seconds(2))
			.build()
			.expect("Mock upstream descriptor should build.")
	}

	/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`
	/// during tests.
	pub fn test_reqwest_client() -> ReqwestClient {
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Wraps `descriptor` in an upstream client built on [`test_reqwest_client`].
	pub fn test_upstream_client(descriptor: UpstreamDescriptor) -> UpstreamClient {
		UpstreamClient::with_client(test_reqwest_client(), descriptor)
	}

	/// Wires a fetcher against `descriptor`, returning the shared store for inspection.
	pub fn build_test_fetcher(descriptor: UpstreamDescriptor) -> (DataFetcher, CredentialStore) {
		let client = test_upstream_client(descriptor);
		let store = CredentialStore::default();
		let provider = CredentialProvider::new(client.clone(), store.clone());

		(DataFetcher::new(client, provider), store)
	}

	/// Builds the shared application state used by HTTP-level tests.
	pub fn build_test_state(base: &str) -> (AppState, CredentialStore) {
		let (fetcher, store) = build_test_fetcher(test_descriptor(base));

		(AppState::new(fetcher), store)
	}

	/// Serves `app` on an ephemeral loopback port and returns its base URL.
	pub async fn spawn_test_server(app: axum::Router) -> Url {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("Failed to bind an ephemeral test port.");
		let addr = listener.local_addr().expect("Bound listener should expose its address.");

		tokio::spawn(crate::server::serve(listener, app));

		Url::parse(&format!("http://{addr}/")).expect("Loopback URL should parse.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
use color_eyre as _;
