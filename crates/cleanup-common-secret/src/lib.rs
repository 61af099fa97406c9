// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for shared secrets.
//!
//! Channel keys, service keys and anything else read from the secret store
//! travel through the authorization layer as a [`SecretString`]:
//!
//! - `Debug`, `Display` and `Serialize` all print [`REDACTED`]
//! - the buffer is zeroized on drop
//! - the raw value is only reachable through [`Secret::expose`]
//! - [`Secret::matches`] compares a candidate in constant time
//!
//! ```
//! use cleanup_common_secret::SecretString;
//!
//! let channel_key = SecretString::new("k1-channel".to_string());
//!
//! assert_eq!(format!("{channel_key}"), "[REDACTED]");
//! assert!(channel_key.matches("k1-channel"));
//! assert!(!channel_key.matches("k1-channe"));
//! ```

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Placeholder written wherever a secret would otherwise be printed.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never reach a log line or a response body.
///
/// There is no `Deref`; callers opt in with [`Secret::expose`].
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// The common case: a secret string.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the raw value.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Clone the raw value out. The wrapper's own buffer is still zeroized
	/// when it drops.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl<T> Secret<T>
where
	T: Zeroize + AsRef<[u8]>,
{
	/// Constant-time comparison against an untrusted candidate.
	///
	/// A length difference returns early; only equal-length inputs are
	/// compared byte by byte.
	pub fn matches(&self, candidate: impl AsRef<[u8]>) -> bool {
		let expected = self.inner.as_ref();
		let candidate = candidate.as_ref();
		if expected.len() != candidate.len() {
			return false;
		}
		expected.ct_eq(candidate).into()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}
