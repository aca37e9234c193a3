//! Authenticated data fetcher.
//!
//! Every call goes through [`CredentialProvider::ensure_valid`] first. Responses are then
//! classified in a fixed order: `403` clears the credential store and surfaces
//! [`Error::Unauthorized`] so the caller's retry re-acquires; any other non-success status
//! surfaces [`Error::Upstream`] with the body; a success body that does not match the
//! expected shape surfaces [`Error::MalformedResponse`]. Requests that never produce a
//! response surface [`Error::Transport`]. Nothing is retried here.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	obs::{self, CallOutcome, CallSpan, UpstreamCall},
	session::CredentialProvider,
	upstream::{OptionChainPayload, OptionChainSnapshot, UpstreamClient, records},
};

/// Fetches option-chain records using the shared session credential.
#[derive(Clone, Debug)]
pub struct DataFetcher {
	client: UpstreamClient,
	sessions: CredentialProvider,
}
impl DataFetcher {
	/// Creates a fetcher over `client`, authenticating through `sessions`.
	pub fn new(client: UpstreamClient, sessions: CredentialProvider) -> Self {
		Self { client, sessions }
	}

	/// Credential provider backing this fetcher.
	pub fn sessions(&self) -> &CredentialProvider {
		&self.sessions
	}

	pub(crate) fn client(&self) -> &UpstreamClient {
		&self.client
	}

	/// Fetches every listed row for `symbol` plus the underlying's spot value.
	pub async fn fetch_option_chain(&self, symbol: &str) -> Result<OptionChainSnapshot> {
		const CALL: UpstreamCall = UpstreamCall::OptionChain;

		let span = CallSpan::new(CALL, "fetch_option_chain");

		obs::record_call_outcome(CALL, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let body = self.fetch_authenticated(symbol).await?;
				let payload = records::decode::<OptionChainPayload>(&body)?;

				Ok(OptionChainSnapshot::from(payload))
			})
			.await;

		if let Err(e) = &result {
			tracing::warn!(symbol, error = %e, "Option-chain fetch failed.");
		}

		obs::record_call_outcome(CALL, CallOutcome::of(&result));

		result
	}

	/// Issues the data request for `symbol` and returns the success body.
	pub(crate) async fn fetch_authenticated(&self, symbol: &str) -> Result<Vec<u8>> {
		let credential = self.sessions.ensure_valid().await?;
		let response = self.client.get_option_chain(symbol, &credential).await?;
		let status = response.status();

		if status == StatusCode::FORBIDDEN {
			self.sessions.invalidate();

			return Err(Error::Unauthorized);
		}

		let body = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(Error::Upstream {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		Ok(body.to_vec())
	}
}
