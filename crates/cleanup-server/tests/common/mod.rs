// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use cleanup_server::AppState;
use cleanup_server_authz::testing::InMemoryStore;
use cleanup_server_authz::{InternalUser, Managers, PolicyEngine, PolicyOptions, Principal, UserId};

pub const EMAIL_HEADER: &str = "x-test-email";

pub struct TestApp {
	pub store: Arc<InMemoryStore>,
	pub state: AppState,
	pub alice: InternalUser,
	pub admin: InternalUser,
}

impl TestApp {
	pub fn new() -> Self {
		Self::with_options(PolicyOptions::default())
	}

	pub fn with_options(options: PolicyOptions) -> Self {
		let store = Arc::new(InMemoryStore::new());
		let alice = store.add_user(InternalUser::new(UserId::generate(), "alice@example.com"));
		let admin =
			store.add_user(InternalUser::new(UserId::generate(), "admin@example.com").site_admin());
		let policy = PolicyEngine::new(Managers::from_shared(store.clone()), options);
		let state = AppState::new(policy, Duration::from_secs(2));
		Self {
			store,
			state,
			alice,
			admin,
		}
	}
}

/// Stands in for upstream token verification: trusts an email header.
pub async fn fake_token_auth(mut request: Request, next: Next) -> Response {
	if let Some(email) = request
		.headers()
		.get(EMAIL_HEADER)
		.and_then(|v| v.to_str().ok())
		.map(str::to_string)
	{
		request.extensions_mut().insert(Principal::with_email(email));
	}
	next.run(request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
	let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

pub fn request(method: &str, uri: &str, email: Option<&str>) -> Request {
	let mut builder = axum::http::Request::builder().method(method).uri(uri);
	if let Some(email) = email {
		builder = builder.header(EMAIL_HEADER, email);
	}
	builder.body(Body::empty()).unwrap()
}
