// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request [`RequestContext`] installation.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use cleanup_server_authz::RequestContext;
use http::request::Parts;
use tracing::{debug, Instrument};

use crate::state::AppState;

/// Attach a fresh [`RequestContext`] to the request.
///
/// The context's cancellation token is a child of the server's shutdown
/// token and is cancelled when this request's future completes or is
/// dropped, so lookups never outlive their request.
pub async fn request_context_middleware(
	State(state): State<AppState>,
	mut request: Request,
	next: Next,
) -> Response {
	let ctx = Arc::new(new_context(&state, request.headers().clone()));
	let _cancel_on_drop = ctx.cancellation().clone().drop_guard();
	let span = tracing::debug_span!("request_context", request_id = %ctx.request_id());

	request.extensions_mut().insert(ctx);
	let response = next.run(request).instrument(span).await;
	debug!("request complete, cancelling outstanding lookups");
	response
}

/// The context installed by [`request_context_middleware`], or a new one if
/// the middleware isn't on this route.
pub(crate) fn context_from_parts(parts: &Parts, state: &AppState) -> Arc<RequestContext> {
	parts
		.extensions
		.get::<Arc<RequestContext>>()
		.cloned()
		.unwrap_or_else(|| Arc::new(new_context(state, parts.headers.clone())))
}

fn new_context(state: &AppState, headers: http::HeaderMap) -> RequestContext {
	RequestContext::new()
		.with_headers(headers)
		.with_cancellation(state.shutdown.child_token())
		.with_timeout(state.lookup_timeout)
}
