// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Requirement checks for handlers and routes.
//!
//! Token verification runs before these layers and inserts the caller's
//! [`Principal`] into request extensions. Requests without one are treated as
//! anonymous and fail every identity-based requirement.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use cleanup_server_authz::{
	AuthzResource, Decision, PolicyEngine, Principal, RequestContext, Requirement,
};
use http::request::Parts;
use tracing::info;

use crate::context::context_from_parts;
use crate::error::AuthzRejection;
use crate::state::AppState;

/// Handler extractor bundling everything needed to evaluate requirements.
///
/// ```ignore
/// async fn update_event(authz: Authz, Path(id): Path<EventId>) -> Result<StatusCode, AuthzRejection> {
///     let event = events.get(&id).await?;
///     authz.require(Requirement::IsEventLeadOrIsAdmin, Some(&event)).await?;
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct Authz {
	ctx: Arc<RequestContext>,
	principal: Principal,
	policy: Arc<PolicyEngine>,
}

impl Authz {
	pub fn principal(&self) -> &Principal {
		&self.principal
	}

	pub fn context(&self) -> &RequestContext {
		&self.ctx
	}

	pub async fn evaluate(
		&self,
		requirement: Requirement,
		resource: Option<&dyn AuthzResource>,
	) -> Decision {
		self
			.policy
			.evaluate(&self.ctx, requirement, &self.principal, resource)
			.await
	}

	/// Evaluate and turn a denial into a 403 rejection.
	pub async fn require(
		&self,
		requirement: Requirement,
		resource: Option<&dyn AuthzResource>,
	) -> Result<(), AuthzRejection> {
		let decision = self.evaluate(requirement, resource).await;
		if decision.succeeded {
			Ok(())
		} else {
			info!(
				request_id = %self.ctx.request_id(),
				requirement = %requirement,
				failure_kind = ?decision.failure_kind(),
				"request forbidden"
			);
			Err(decision.into())
		}
	}
}

impl FromRequestParts<AppState> for Authz {
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let principal = parts
			.extensions
			.get::<Principal>()
			.cloned()
			.unwrap_or_else(Principal::anonymous);
		Ok(Authz {
			ctx: context_from_parts(parts, state),
			principal,
			policy: state.policy.clone(),
		})
	}
}

async fn require_route(
	state: &AppState,
	requirement: Requirement,
	request: Request,
	next: Next,
) -> Response {
	let (mut parts, body) = request.into_parts();
	let authz = match Authz::from_request_parts(&mut parts, state).await {
		Ok(authz) => authz,
		Err(never) => match never {},
	};
	if let Err(rejection) = authz.require(requirement, None).await {
		return rejection.into_response();
	}
	next.run(Request::from_parts(parts, body)).await
}

/// Route layer: the caller must resolve to a directory user.
pub async fn require_valid_user(State(state): State<AppState>, request: Request, next: Next) -> Response {
	require_route(&state, Requirement::ValidUser, request, next).await
}

/// Route layer: the caller must be a site admin.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
	require_route(&state, Requirement::IsAdmin, request, next).await
}
