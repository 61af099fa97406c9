// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::context::context_from_parts;
use crate::error::AuthzRejection;
use crate::state::AppState;

/// Route layer for automation callers: both channel key headers must be
/// present and match the stored secrets. Rejections are 401 with an
/// `{"errors":[{"error": ...}]}` body.
pub async fn channel_key_middleware(
	State(state): State<AppState>,
	request: Request,
	next: Next,
) -> Response {
	let (parts, body) = request.into_parts();
	let ctx = context_from_parts(&parts, &state);

	if let Err(e) = state.policy.channel_key().authenticate(&ctx).await {
		warn!(request_id = %ctx.request_id(), error = %e, "channel key rejected");
		return AuthzRejection::from(e).into_response();
	}

	next.run(Request::from_parts(parts, body)).await
}
