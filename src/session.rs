//! Upstream session lifecycle: a single process-wide credential, its staleness rule, and the
//! provider that re-acquires it on demand.
//!
//! [`CredentialStore`] is the only place the credential lives. [`CredentialProvider`] reads it,
//! treats anything older than the TTL (or absent) as invalid, and performs one acquisition
//! call against the upstream site's root to mint a replacement. Callers that observe an
//! authentication rejection clear the store so the next request re-acquires regardless of age.

mod credential;
mod metrics;
mod provider;
mod store;

pub use credential::*;
pub use metrics::SessionMetrics;
pub use provider::*;
pub use store::CredentialStore;
