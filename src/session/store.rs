//! Thread-safe, process-wide cell holding the current session credential.

// self
use crate::{_prelude::*, session::Credential};

/// Shared credential cell; clones observe and mutate the same slot.
///
/// Access is bounded to [`get`](Self::get), [`set`](Self::set), and [`clear`](Self::clear),
/// none of which have side effects beyond the stored value.
#[derive(Clone, Debug, Default)]
pub struct CredentialStore(Arc<RwLock<Option<Credential>>>);
impl CredentialStore {
	/// Returns a copy of the stored credential, if any.
	pub fn get(&self) -> Option<Credential> {
		self.0.read().clone()
	}

	/// Replaces the stored credential.
	pub fn set(&self, credential: Credential) {
		*self.0.write() = Some(credential);
	}

	/// Drops the stored credential, returning it if one was present.
	pub fn clear(&self) -> Option<Credential> {
		self.0.write().take()
	}
}
