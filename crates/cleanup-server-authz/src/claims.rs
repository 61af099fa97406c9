// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validated claims attached to an authenticated request.
//!
//! Token verification happens upstream; by the time a [`Principal`] reaches
//! this crate its claims are trusted. Roles are never read from claims, they
//! are derived from the user directory on every evaluation.

use serde::{Deserialize, Serialize};

/// Short email claim emitted by most identity providers.
pub const EMAIL_CLAIM: &str = "email";

/// Long-form email address claim, consulted when [`EMAIL_CLAIM`] is absent.
pub const EMAIL_ADDRESS_CLAIM: &str =
	"http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";

/// Opaque subject identifier issued by the identity provider.
pub const SUBJECT_CLAIM: &str = "sub";

/// One `(name, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
	pub name: String,
	pub value: String,
}

/// Unordered bag of claims. Names may repeat; lookups take the first
/// non-blank value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet {
	claims: Vec<Claim>,
}

impl ClaimSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: append a claim.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.push(name, value);
		self
	}

	pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.claims.push(Claim {
			name: name.into(),
			value: value.into(),
		});
	}

	/// First non-blank value for `name`, exactly as issued. Normalizing the
	/// value is left to the user directory.
	pub fn first(&self, name: &str) -> Option<&str> {
		self
			.claims
			.iter()
			.find(|c| c.name == name && !c.value.trim().is_empty())
			.map(|c| c.value.as_str())
	}

	/// The `email` claim, falling back to the email-address claim.
	pub fn email(&self) -> Option<&str> {
		self
			.first(EMAIL_CLAIM)
			.or_else(|| self.first(EMAIL_ADDRESS_CLAIM))
	}

	pub fn subject(&self) -> Option<&str> {
		self.first(SUBJECT_CLAIM)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Claim> {
		self.claims.iter()
	}

	pub fn len(&self) -> usize {
		self.claims.len()
	}

	pub fn is_empty(&self) -> bool {
		self.claims.is_empty()
	}
}

impl<N, V> FromIterator<(N, V)> for ClaimSet
where
	N: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
		let mut set = ClaimSet::new();
		for (name, value) in iter {
			set.push(name, value);
		}
		set
	}
}

/// The authenticated caller for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub claims: ClaimSet,
}

impl Principal {
	pub fn new(claims: ClaimSet) -> Self {
		Self { claims }
	}

	/// A principal with no claims. Every identity-based requirement denies it.
	pub fn anonymous() -> Self {
		Self::default()
	}

	/// Shorthand for a principal carrying only an `email` claim.
	pub fn with_email(email: impl Into<String>) -> Self {
		Self::new(ClaimSet::new().with(EMAIL_CLAIM, email))
	}

	pub fn email(&self) -> Option<&str> {
		self.claims.email()
	}

	pub fn subject(&self) -> Option<&str> {
		self.claims.subject()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn email_claim_wins_over_email_address_claim() {
		let claims = ClaimSet::new()
			.with(EMAIL_ADDRESS_CLAIM, "long@example.com")
			.with(EMAIL_CLAIM, "short@example.com");
		assert_eq!(claims.email(), Some("short@example.com"));
	}

	#[test]
	fn falls_back_to_email_address_claim() {
		let claims = ClaimSet::new()
			.with(SUBJECT_CLAIM, "auth0|123")
			.with(EMAIL_ADDRESS_CLAIM, "long@example.com");
		assert_eq!(claims.email(), Some("long@example.com"));
		assert_eq!(claims.subject(), Some("auth0|123"));
	}

	#[test]
	fn blank_values_count_as_absent() {
		let claims = ClaimSet::new()
			.with(EMAIL_CLAIM, "   ")
			.with(EMAIL_ADDRESS_CLAIM, "fallback@example.com");
		assert_eq!(claims.email(), Some("fallback@example.com"));
	}

	#[test]
	fn values_are_not_trimmed() {
		let claims = ClaimSet::new().with(EMAIL_CLAIM, "  alice@example.com\t");
		assert_eq!(claims.email(), Some("  alice@example.com\t"));
	}

	#[test]
	fn anonymous_principal_has_no_identity() {
		let principal = Principal::anonymous();
		assert!(principal.email().is_none());
		assert!(principal.subject().is_none());
		assert!(principal.claims.is_empty());
	}

	#[test]
	fn collects_from_pairs() {
		let claims: ClaimSet = [("email", "alice@example.com"), ("sub", "abc")]
			.into_iter()
			.collect();
		assert_eq!(claims.len(), 2);
		assert_eq!(claims.email(), Some("alice@example.com"));
	}

	#[test]
	fn serializes_as_list_of_pairs() {
		let principal = Principal::with_email("alice@example.com");
		let json = serde_json::to_value(&principal).unwrap();
		assert_eq!(json["claims"][0]["name"], "email");
		assert_eq!(json["claims"][0]["value"], "alice@example.com");
	}
}
