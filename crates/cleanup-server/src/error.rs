// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP renderings of authorization failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cleanup_server_authz::{ChannelKeyError, Decision, FailureReason};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthzRejection {
	/// A requirement was not satisfied. The reason is logged, never sent.
	#[error("access denied")]
	Forbidden(Option<FailureReason>),

	#[error(transparent)]
	ChannelKey(#[from] ChannelKeyError),
}

impl From<Decision> for AuthzRejection {
	fn from(decision: Decision) -> Self {
		AuthzRejection::Forbidden(decision.reason)
	}
}

#[derive(Serialize)]
struct ForbiddenBody {
	error: &'static str,
	message: &'static str,
}

#[derive(Serialize)]
struct ChannelKeyBody {
	errors: Vec<ChannelKeyEntry>,
}

#[derive(Serialize)]
struct ChannelKeyEntry {
	error: String,
}

impl IntoResponse for AuthzRejection {
	fn into_response(self) -> Response {
		match self {
			AuthzRejection::Forbidden(_) => (
				StatusCode::FORBIDDEN,
				Json(ForbiddenBody {
					error: "forbidden",
					message: "You do not have permission to perform this action.",
				}),
			)
				.into_response(),
			AuthzRejection::ChannelKey(e) => (
				StatusCode::UNAUTHORIZED,
				Json(ChannelKeyBody {
					errors: vec![ChannelKeyEntry {
						error: e.to_string(),
					}],
				}),
			)
				.into_response(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cleanup_server_authz::{AuthzError, Requirement};

	#[test]
	fn forbidden_is_403() {
		let rejection: AuthzRejection =
			Decision::deny(Requirement::IsAdmin, &AuthzError::MissingClaim).into();
		assert_eq!(rejection.into_response().status(), StatusCode::FORBIDDEN);
	}

	#[test]
	fn channel_key_is_401() {
		let response = AuthzRejection::from(ChannelKeyError::MissingServiceKey).into_response();
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}
}
