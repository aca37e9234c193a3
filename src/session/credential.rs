//! Session credential model and its redacting secret wrapper.

// self
use crate::_prelude::*;

/// Redacted session secret keeping cookie material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret(String);
impl SessionSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SessionSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SessionSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SessionSecret").field(&"<redacted>").finish()
	}
}
impl Display for SessionSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Opaque upstream session token-set stamped with the instant its acquisition completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	cookies: SessionSecret,
	acquired_at: OffsetDateTime,
}
impl Credential {
	/// Creates a credential from a ready-to-send `Cookie` header value.
	pub fn new(cookies: impl Into<String>, acquired_at: OffsetDateTime) -> Self {
		Self { cookies: SessionSecret::new(cookies), acquired_at }
	}

	/// Builds a credential from raw `Set-Cookie` header values.
	///
	/// Only the leading `name=value` pair of each header is kept; attributes such as `Path`
	/// or `Expires` are dropped. Returns `None` when no header yields a usable pair.
	pub fn from_set_cookie<'a, I>(headers: I, acquired_at: OffsetDateTime) -> Option<Self>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let pairs = headers
			.into_iter()
			.filter_map(|header| header.split(';').next())
			.map(str::trim)
			.filter(|pair| pair.split_once('=').is_some_and(|(name, _)| !name.trim().is_empty()))
			.collect::<Vec<_>>();

		if pairs.is_empty() {
			return None;
		}

		Some(Self::new(pairs.join("; "), acquired_at))
	}

	/// Returns the `Cookie` header value. Callers must avoid logging this string.
	pub fn cookie_header(&self) -> &str {
		self.cookies.expose()
	}

	/// Instant the acquisition call completed.
	pub fn acquired_at(&self) -> OffsetDateTime {
		self.acquired_at
	}

	/// Age of the credential relative to `now`.
	pub fn age_at(&self, now: OffsetDateTime) -> Duration {
		now - self.acquired_at
	}

	/// Whether the credential may still be used at `now`; an age equal to `ttl` is fresh.
	pub fn is_fresh_at(&self, now: OffsetDateTime, ttl: Duration) -> bool {
		self.age_at(now) <= ttl
	}
}
