// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, FailureKind};
use crate::requirement::Requirement;

/// Why a requirement was not satisfied. Diagnostic only: the outcome is
/// decided by [`Decision::succeeded`] alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
	pub requirement: Requirement,
	pub kind: FailureKind,
	pub message: String,
}

/// Outcome of evaluating one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
	pub succeeded: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<FailureReason>,
}

impl Decision {
	pub fn allow() -> Self {
		Self {
			succeeded: true,
			reason: None,
		}
	}

	pub fn deny(requirement: Requirement, error: &AuthzError) -> Self {
		Self {
			succeeded: false,
			reason: Some(FailureReason {
				requirement,
				kind: error.kind(),
				message: error.to_string(),
			}),
		}
	}

	pub fn is_allowed(&self) -> bool {
		self.succeeded
	}

	pub fn failure_kind(&self) -> Option<FailureKind> {
		self.reason.as_ref().map(|r| r.kind)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn denial_carries_reason() {
		let decision = Decision::deny(Requirement::IsAdmin, &AuthzError::MissingClaim);
		assert!(!decision.is_allowed());
		assert_eq!(decision.failure_kind(), Some(FailureKind::MissingClaim));
		let reason = decision.reason.unwrap();
		assert_eq!(reason.requirement, Requirement::IsAdmin);
		assert_eq!(reason.message, "principal carries no usable identity claim");
	}

	#[test]
	fn allow_serializes_without_reason() {
		let json = serde_json::to_value(Decision::allow()).unwrap();
		assert_eq!(json, serde_json::json!({ "succeeded": true }));
	}
}
