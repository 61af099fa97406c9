// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request evaluation context.
//!
//! A [`RequestContext`] is created empty when a request arrives and dropped
//! when it completes. It carries:
//!
//! - the resolved [`UserId`], written at most once
//! - the request's cancellation token and optional deadline
//! - the inbound headers, read by the channel key check
//!
//! Every external lookup an evaluator performs goes through
//! [`RequestContext::guard`], so a cancelled or expired request stops waiting
//! on the user directory or event store immediately.

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use http::HeaderMap;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use crate::error::AuthzError;
use crate::types::UserId;

#[derive(Debug)]
pub struct RequestContext {
	request_id: Uuid,
	user_id: OnceLock<UserId>,
	cancellation: CancellationToken,
	deadline: Option<Instant>,
	headers: HeaderMap,
}

impl Default for RequestContext {
	fn default() -> Self {
		Self::new()
	}
}

impl RequestContext {
	pub fn new() -> Self {
		Self {
			request_id: Uuid::new_v4(),
			user_id: OnceLock::new(),
			cancellation: CancellationToken::new(),
			deadline: None,
			headers: HeaderMap::new(),
		}
	}

	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Tie this context to an existing cancellation token, typically a child
	/// of the server's shutdown token.
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancellation = token;
		self
	}

	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(deadline);
		self
	}

	/// Deadline relative to now.
	pub fn with_timeout(self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	pub fn request_id(&self) -> Uuid {
		self.request_id
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn cancellation(&self) -> &CancellationToken {
		&self.cancellation
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// The user id resolved earlier in this request, if any.
	pub fn user_id(&self) -> Option<UserId> {
		self.user_id.get().copied()
	}

	/// Record the resolved user id. The first write wins; returns the id that
	/// is now cached.
	pub fn remember_user_id(&self, user_id: UserId) -> UserId {
		let cached = *self.user_id.get_or_init(|| user_id);
		if cached != user_id {
			warn!(
				request_id = %self.request_id,
				cached_user_id = %cached,
				resolved_user_id = %user_id,
				"identity changed within one request; keeping first resolution"
			);
		}
		cached
	}

	/// Await one external lookup under this request's cancellation and
	/// deadline.
	pub async fn guard<F, T, E>(&self, lookup: F) -> Result<T, AuthzError>
	where
		F: Future<Output = Result<T, E>>,
		E: Into<AuthzError>,
	{
		if self.cancellation.is_cancelled() {
			return Err(AuthzError::Cancelled);
		}

		let bounded = async {
			match self.deadline {
				Some(deadline) => tokio::time::timeout_at(deadline, lookup)
					.await
					.map_err(|_| AuthzError::DeadlineExceeded)?
					.map_err(Into::into),
				None => lookup.await.map_err(Into::into),
			}
		};

		tokio::select! {
			biased;
			_ = self.cancellation.cancelled() => Err(AuthzError::Cancelled),
			result = bounded => result,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::LookupError;

	#[test]
	fn first_writer_wins() {
		let ctx = RequestContext::new();
		let first = UserId::generate();
		let second = UserId::generate();

		assert_eq!(ctx.user_id(), None);
		assert_eq!(ctx.remember_user_id(first), first);
		assert_eq!(ctx.remember_user_id(second), first);
		assert_eq!(ctx.user_id(), Some(first));
	}

	#[test]
	fn contexts_get_distinct_request_ids() {
		assert_ne!(RequestContext::new().request_id(), RequestContext::new().request_id());
	}

	#[tokio::test]
	async fn guard_passes_results_through() {
		let ctx = RequestContext::new();
		let ok: Result<u32, AuthzError> = ctx.guard(async { Ok::<_, LookupError>(7) }).await;
		assert_eq!(ok.unwrap(), 7);

		let err = ctx
			.guard(async { Err::<u32, _>(LookupError::Backend("boom".into())) })
			.await
			.unwrap_err();
		assert!(matches!(err, AuthzError::UpstreamLookupFailure(_)));
	}

	#[tokio::test]
	async fn guard_short_circuits_when_already_cancelled() {
		let token = CancellationToken::new();
		token.cancel();
		let ctx = RequestContext::new().with_cancellation(token);

		let err = ctx
			.guard(async { Ok::<_, LookupError>(()) })
			.await
			.unwrap_err();
		assert!(matches!(err, AuthzError::Cancelled));
	}

	#[tokio::test]
	async fn guard_aborts_pending_lookup_on_cancel() {
		let token = CancellationToken::new();
		let ctx = RequestContext::new().with_cancellation(token.clone());

		let canceller = tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(10)).await;
			token.cancel();
		});
		let err = ctx
			.guard(std::future::pending::<Result<(), LookupError>>())
			.await
			.unwrap_err();
		canceller.await.unwrap();
		assert!(matches!(err, AuthzError::Cancelled));
	}

	#[tokio::test(start_paused = true)]
	async fn guard_reports_deadline() {
		let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));
		let err = ctx
			.guard(std::future::pending::<Result<(), LookupError>>())
			.await
			.unwrap_err();
		assert!(matches!(err, AuthzError::DeadlineExceeded));
	}
}
