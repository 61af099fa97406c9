// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! axum integration for cleanup event authorization.
//!
//! - [`request_context_middleware`] gives every request its own
//!   [`RequestContext`](cleanup_server_authz::RequestContext)
//! - [`Authz`] lets handlers check requirements against loaded resources
//! - [`require_valid_user`] and [`require_admin`] guard whole routes
//! - [`channel_key_middleware`] guards automation endpoints
//!
//! ```ignore
//! let config = cleanup_server_config::load_config()?;
//! init_tracing(&config.logging)?;
//! let state = AppState::from_config(&config, managers);
//!
//! let app = with_request_context(
//!     Router::new()
//!         .route("/events/{id}", put(update_event))
//!         .route("/ifttt/v1/triggers/new_event", post(new_event)
//!             .route_layer(from_fn_with_state(state.clone(), channel_key_middleware))),
//!     state.clone(),
//! )
//! .with_state(state);
//! ```

pub mod authz;
pub mod channel_key;
pub mod context;
pub mod error;
pub mod logging;
pub mod state;

pub use authz::{require_admin, require_valid_user, Authz};
pub use channel_key::channel_key_middleware;
pub use context::request_context_middleware;
pub use error::AuthzRejection;
pub use logging::init_tracing;
pub use state::{policy_options, AppState};

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower::ServiceBuilder;

/// Install the request context layer on every route of `router`.
pub fn with_request_context(router: Router<AppState>, state: AppState) -> Router<AppState> {
	router.layer(
		ServiceBuilder::new().layer(from_fn_with_state(state, request_context_middleware)),
	)
}
