//! Credential provider: staleness check, single-flight acquisition, and forced invalidation.

// self
use crate::{
	_prelude::*,
	error::AcquisitionError,
	obs::{self, CallOutcome, CallSpan, UpstreamCall},
	session::{Credential, CredentialStore, SessionMetrics},
	upstream::UpstreamClient,
};

/// Hands out a valid upstream session credential, acquiring a new one only when the stored
/// credential is absent or older than the descriptor's TTL.
///
/// Fresh credentials are returned without locking or network I/O. Otherwise callers queue on
/// a single-flight guard and re-check the store once they hold it, so a burst of requests
/// arriving on a stale store triggers exactly one acquisition call. A failed acquisition
/// leaves the store untouched; the next call simply tries again.
#[derive(Clone, Debug)]
pub struct CredentialProvider {
	client: UpstreamClient,
	store: CredentialStore,
	metrics: Arc<SessionMetrics>,
	guard: Arc<AsyncMutex<()>>,
}
impl CredentialProvider {
	/// Creates a provider sharing `store` with any other holder of the same store.
	pub fn new(client: UpstreamClient, store: CredentialStore) -> Self {
		Self { client, store, metrics: Default::default(), guard: Default::default() }
	}

	/// Store backing this provider.
	pub fn store(&self) -> &CredentialStore {
		&self.store
	}

	/// Lifecycle counters for this provider.
	pub fn metrics(&self) -> &SessionMetrics {
		&self.metrics
	}

	/// Maximum credential age before re-acquisition.
	pub fn ttl(&self) -> Duration {
		self.client.descriptor().credential_ttl
	}

	/// Returns a credential that is valid now, acquiring one if needed.
	pub async fn ensure_valid(&self) -> Result<Credential, AcquisitionError> {
		if let Some(current) = self.fresh(OffsetDateTime::now_utc()) {
			self.metrics.record_reuse();

			return Ok(current);
		}

		let _singleflight = self.guard.lock().await;

		// Another caller may have finished acquiring while this one waited.
		if let Some(current) = self.fresh(OffsetDateTime::now_utc()) {
			self.metrics.record_reuse();

			return Ok(current);
		}

		let credential = self.acquire().await.inspect_err(|_| self.metrics.record_failure())?;

		self.store.set(credential.clone());
		self.metrics.record_acquisition();

		Ok(credential)
	}

	/// Drops the stored credential so the next [`ensure_valid`](Self::ensure_valid) call
	/// acquires a new one regardless of age.
	pub fn invalidate(&self) {
		if self.store.clear().is_some() {
			tracing::info!("Session credential invalidated after upstream rejection.");
		}

		self.metrics.record_invalidation();
	}

	fn fresh(&self, now: OffsetDateTime) -> Option<Credential> {
		self.store.get().filter(|credential| credential.is_fresh_at(now, self.ttl()))
	}

	async fn acquire(&self) -> Result<Credential, AcquisitionError> {
		const CALL: UpstreamCall = UpstreamCall::Session;

		let span = CallSpan::new(CALL, "acquire");

		obs::record_call_outcome(CALL, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.client.open_session().await?;
				let status = response.status();

				if !status.is_success() {
					return Err(AcquisitionError::Rejected { status: status.as_u16() });
				}

				let cookies = response
					.headers()
					.get_all(reqwest::header::SET_COOKIE)
					.iter()
					.filter_map(|value| value.to_str().ok());

				Credential::from_set_cookie(cookies, OffsetDateTime::now_utc())
					.ok_or(AcquisitionError::MissingSessionHeaders)
			})
			.await;

		match &result {
			Ok(_) => tracing::info!("Session credential refreshed."),
			Err(e) => tracing::warn!(error = %e, "Session credential acquisition failed."),
		}

		obs::record_call_outcome(CALL, CallOutcome::of(&result));

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn provider() -> CredentialProvider {
		let (fetcher, _) = build_test_fetcher(test_descriptor("http://127.0.0.1:9/"));

		fetcher.sessions().clone()
	}

	#[tokio::test]
	async fn fresh_credential_is_reused_without_io() {
		let provider = provider();
		let seeded =
			Credential::new("nsit=warm", OffsetDateTime::now_utc() - Duration::minutes(29));

		provider.store().set(seeded.clone());

		let credential =
			provider.ensure_valid().await.expect("Fresh credential should be reused offline.");

		assert_eq!(credential, seeded);
		assert_eq!(provider.metrics().reuses(), 1);
		assert_eq!(provider.metrics().acquisitions(), 0);
	}

	#[tokio::test]
	async fn invalidate_clears_shared_store() {
		let provider = provider();

		provider.store().set(Credential::new("nsit=warm", OffsetDateTime::now_utc()));
		provider.invalidate();

		assert!(provider.store().get().is_none());
		assert_eq!(provider.metrics().invalidations(), 1);
	}
}
