// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for session credential lifecycle events.
#[derive(Debug, Default)]
pub struct SessionMetrics {
	acquisitions: AtomicU64,
	reuses: AtomicU64,
	invalidations: AtomicU64,
	failures: AtomicU64,
}
impl SessionMetrics {
	/// Returns the number of successful acquisition calls.
	pub fn acquisitions(&self) -> u64 {
		self.acquisitions.load(Ordering::Relaxed)
	}

	/// Returns the number of calls served from a fresh stored credential.
	pub fn reuses(&self) -> u64 {
		self.reuses.load(Ordering::Relaxed)
	}

	/// Returns the number of forced invalidations after upstream rejections.
	pub fn invalidations(&self) -> u64 {
		self.invalidations.load(Ordering::Relaxed)
	}

	/// Returns the number of failed acquisition calls.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_acquisition(&self) {
		self.acquisitions.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reuse(&self) {
		self.reuses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_invalidation(&self) {
		self.invalidations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
