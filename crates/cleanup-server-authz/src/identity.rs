// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Claims to internal user resolution.
//!
//! The resolver is the only place claims are read. Every evaluator goes
//! through it, so the email precedence and the request-scoped id cache are
//! applied uniformly.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::claims::Principal;
use crate::context::RequestContext;
use crate::error::AuthzError;
use crate::managers::UserDirectory;
use crate::user::InternalUser;

#[derive(Clone)]
pub struct IdentityResolver {
	users: Arc<dyn UserDirectory>,
	subject_fallback: bool,
}

impl IdentityResolver {
	pub fn new(users: Arc<dyn UserDirectory>) -> Self {
		Self {
			users,
			subject_fallback: false,
		}
	}

	/// Resolve principals that carry no email claim through their subject
	/// identifier.
	pub fn with_subject_fallback(mut self, enabled: bool) -> Self {
		self.subject_fallback = enabled;
		self
	}

	/// Resolve the principal to a directory user.
	///
	/// `email` wins over the email-address claim. The user record is loaded
	/// fresh every time; only its id is remembered on `ctx`.
	#[instrument(level = "debug", skip_all, fields(request_id = %ctx.request_id()))]
	pub async fn resolve(
		&self,
		ctx: &RequestContext,
		principal: &Principal,
	) -> Result<InternalUser, AuthzError> {
		let user = if let Some(email) = principal.email() {
			ctx
				.guard(self.users.find_user_by_email(email))
				.await?
				.ok_or_else(|| AuthzError::UserNotFound(email.to_string()))?
		} else if let Some(subject) = principal.subject().filter(|_| self.subject_fallback) {
			debug!("no email claim, resolving by subject");
			ctx
				.guard(self.users.find_user_by_external_id(subject))
				.await?
				.ok_or_else(|| AuthzError::UserNotFound(subject.to_string()))?
		} else {
			return Err(AuthzError::MissingClaim);
		};

		ctx.remember_user_id(user.id);
		debug!(user_id = %user.id, is_site_admin = user.is_site_admin, "identity resolved");
		Ok(user)
	}
}

impl std::fmt::Debug for IdentityResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IdentityResolver")
			.field("subject_fallback", &self.subject_fallback)
			.finish_non_exhaustive()
	}
}
