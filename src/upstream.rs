//! Upstream-facing plumbing: endpoint descriptors, the HTTP transport (direct or relayed),
//! payload shapes, and the authenticated data fetcher built on the session provider.

pub mod descriptor;
pub mod fetcher;
pub mod records;
pub mod transport;

mod vix;

pub use descriptor::*;
pub use fetcher::*;
pub use records::*;
pub use transport::*;
