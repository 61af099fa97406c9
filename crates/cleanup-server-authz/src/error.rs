// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization error types.
//!
//! Nothing in here ever reaches the host as an error: the policy engine turns
//! every [`AuthzError`] into a denied [`Decision`](crate::Decision) carrying a
//! [`FailureKind`] for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::channel_key::ChannelKeyError;
use crate::requirement::Requirement;
use crate::resource::ResourceKind;
use crate::types::EventId;

/// Failure reported by a user, event, roster or membership manager.
#[derive(Debug, Error)]
pub enum LookupError {
	/// The backing store could not be reached.
	#[error("backend unavailable: {0}")]
	Unavailable(String),

	/// The backing store answered with an error.
	#[error("lookup failed: {0}")]
	Backend(String),
}

/// Failure reported by the secret store.
#[derive(Debug, Error)]
pub enum SecretStoreError {
	#[error("secret not found: {0}")]
	NotFound(String),

	#[error("secret store unavailable: {0}")]
	Unavailable(String),
}

/// Facet that could not be extracted from a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFacet {
	Event,
	Partner,
	Company,
}

impl fmt::Display for ResourceFacet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceFacet::Event => write!(f, "event"),
			ResourceFacet::Partner => write!(f, "partner"),
			ResourceFacet::Company => write!(f, "company"),
		}
	}
}

/// Everything that can stop a requirement from succeeding.
#[derive(Debug, Error)]
pub enum AuthzError {
	// =========================================================================
	// Identity
	// =========================================================================
	/// Neither email claim (nor, when enabled, the subject claim) is present.
	#[error("principal carries no usable identity claim")]
	MissingClaim,

	/// The claim value is not registered in the user directory.
	#[error("no user registered for {0}")]
	UserNotFound(String),

	// =========================================================================
	// Resource
	// =========================================================================
	/// The requirement needs a target resource but none was supplied.
	#[error("{0} requires a target resource")]
	MissingResource(Requirement),

	/// The resource does not expose the facet the requirement keys on.
	#[error("cannot determine owning {facet} of {kind} resource")]
	ResourceTypeUnrecognized {
		kind: ResourceKind,
		facet: ResourceFacet,
	},

	/// The authoritative event record does not exist.
	#[error("event {0} not found")]
	EventNotFound(EventId),

	// =========================================================================
	// Predicate
	// =========================================================================
	/// The requirement's predicate evaluated to false.
	#[error("{0} not satisfied")]
	PermissionDenied(Requirement),

	/// Channel key headers were missing or did not match.
	#[error("channel key rejected: {0}")]
	ChannelKeyRejected(ChannelKeyError),

	// =========================================================================
	// Upstream
	// =========================================================================
	#[error("upstream lookup failed: {0}")]
	UpstreamLookupFailure(#[from] LookupError),

	#[error("secret store failure: {0}")]
	SecretStoreFailure(#[from] SecretStoreError),

	/// The enclosing request was cancelled while a lookup was in flight.
	#[error("request cancelled")]
	Cancelled,

	/// The enclosing request's deadline passed while a lookup was in flight.
	#[error("request deadline exceeded")]
	DeadlineExceeded,
}

impl AuthzError {
	pub fn kind(&self) -> FailureKind {
		match self {
			AuthzError::MissingClaim => FailureKind::MissingClaim,
			AuthzError::UserNotFound(_) => FailureKind::UserNotFound,
			AuthzError::MissingResource(_) => FailureKind::MissingResource,
			AuthzError::ResourceTypeUnrecognized { .. } => FailureKind::ResourceTypeUnrecognized,
			AuthzError::EventNotFound(_) => FailureKind::EventNotFound,
			AuthzError::PermissionDenied(_) | AuthzError::ChannelKeyRejected(_) => {
				FailureKind::PermissionDenied
			}
			AuthzError::UpstreamLookupFailure(_) => FailureKind::UpstreamLookupFailure,
			AuthzError::SecretStoreFailure(_) => FailureKind::SecretStoreFailure,
			AuthzError::Cancelled => FailureKind::Cancelled,
			AuthzError::DeadlineExceeded => FailureKind::DeadlineExceeded,
		}
	}

	/// True when the denial was caused by an operational failure rather than
	/// by the caller lacking standing.
	pub fn is_operational(&self) -> bool {
		matches!(
			self,
			AuthzError::UpstreamLookupFailure(_)
				| AuthzError::SecretStoreFailure(_)
				| AuthzError::Cancelled
				| AuthzError::DeadlineExceeded
		)
	}
}

impl From<ChannelKeyError> for AuthzError {
	fn from(err: ChannelKeyError) -> Self {
		match err {
			ChannelKeyError::Internal(inner) => *inner,
			other => AuthzError::ChannelKeyRejected(other),
		}
	}
}

/// Serializable classification of an [`AuthzError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
	MissingClaim,
	UserNotFound,
	MissingResource,
	ResourceTypeUnrecognized,
	EventNotFound,
	PermissionDenied,
	UpstreamLookupFailure,
	SecretStoreFailure,
	Cancelled,
	DeadlineExceeded,
}

impl fmt::Display for FailureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			FailureKind::MissingClaim => "missing_claim",
			FailureKind::UserNotFound => "user_not_found",
			FailureKind::MissingResource => "missing_resource",
			FailureKind::ResourceTypeUnrecognized => "resource_type_unrecognized",
			FailureKind::EventNotFound => "event_not_found",
			FailureKind::PermissionDenied => "permission_denied",
			FailureKind::UpstreamLookupFailure => "upstream_lookup_failure",
			FailureKind::SecretStoreFailure => "secret_store_failure",
			FailureKind::Cancelled => "cancelled",
			FailureKind::DeadlineExceeded => "deadline_exceeded",
		};
		write!(f, "{s}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn operational_failures_are_flagged() {
		assert!(AuthzError::Cancelled.is_operational());
		assert!(AuthzError::from(LookupError::Unavailable("db".into())).is_operational());
		assert!(!AuthzError::MissingClaim.is_operational());
		assert!(!AuthzError::PermissionDenied(Requirement::IsAdmin).is_operational());
	}

	#[test]
	fn unrecognized_resource_message_names_kind_and_facet() {
		let err = AuthzError::ResourceTypeUnrecognized {
			kind: ResourceKind::Partner,
			facet: ResourceFacet::Event,
		};
		assert_eq!(err.to_string(), "cannot determine owning event of partner resource");
		assert_eq!(err.kind(), FailureKind::ResourceTypeUnrecognized);
	}

	#[test]
	fn channel_key_internal_unwraps_to_cause() {
		let err = AuthzError::from(ChannelKeyError::Internal(Box::new(
			AuthzError::SecretStoreFailure(SecretStoreError::Unavailable("vault".into())),
		)));
		assert_eq!(err.kind(), FailureKind::SecretStoreFailure);

		let rejected = AuthzError::from(ChannelKeyError::MissingServiceKey);
		assert_eq!(rejected.kind(), FailureKind::PermissionDenied);
	}

	#[test]
	fn failure_kind_serializes_snake_case() {
		let json = serde_json::to_string(&FailureKind::ResourceTypeUnrecognized).unwrap();
		assert_eq!(json, "\"resource_type_unrecognized\"");
		assert_eq!(FailureKind::UserNotFound.to_string(), "user_not_found");
	}
}
