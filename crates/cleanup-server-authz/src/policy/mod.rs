// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Requirement evaluation.
//!
//! Every evaluation follows the same shape:
//!
//! 1. resolve the principal to a directory user (except [`Requirement::ChannelKey`])
//! 2. short-circuit for site admins on the `OrIsAdmin` requirements
//! 3. apply the requirement's predicate
//!
//! Any error along the way becomes a denied [`Decision`]. Nothing is ever
//! returned to the caller as an `Err`.

mod event_lead;
mod membership;
mod ownership;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, field, instrument, warn, Span};

use crate::channel_key::{ChannelKeyAuthenticator, ChannelKeyConfig};
use crate::claims::Principal;
use crate::context::RequestContext;
use crate::decision::Decision;
use crate::error::AuthzError;
use crate::identity::IdentityResolver;
use crate::managers::Managers;
use crate::requirement::Requirement;
use crate::resource::AuthzResource;

/// Where `IsEventLeadOrIsAdmin` reads the event creator from.
///
/// `IsEventLead` always reloads the event; this only affects the `OrIsAdmin`
/// variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatorCheck {
	/// Trust the creator field on the resource passed in.
	#[default]
	ResourceField,
	/// Reload the event from the store, like `IsEventLead`.
	Authoritative,
}

impl CreatorCheck {
	pub fn as_str(&self) -> &'static str {
		match self {
			CreatorCheck::ResourceField => "resource_field",
			CreatorCheck::Authoritative => "authoritative",
		}
	}
}

impl fmt::Display for CreatorCheck {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown creator check '{0}', expected resource_field or authoritative")]
pub struct UnknownCreatorCheck(pub String);

impl FromStr for CreatorCheck {
	type Err = UnknownCreatorCheck;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"resource_field" | "resource" => Ok(CreatorCheck::ResourceField),
			"authoritative" => Ok(CreatorCheck::Authoritative),
			_ => Err(UnknownCreatorCheck(s.to_string())),
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct PolicyOptions {
	pub lead_or_admin_creator_check: CreatorCheck,
	pub subject_fallback: bool,
	pub channel_key: ChannelKeyConfig,
}

/// Evaluates requirements against a principal and an optional resource.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
	identity: IdentityResolver,
	managers: Managers,
	channel_key: ChannelKeyAuthenticator,
	options: PolicyOptions,
}

impl PolicyEngine {
	pub fn new(managers: Managers, options: PolicyOptions) -> Self {
		let identity = IdentityResolver::new(managers.users.clone())
			.with_subject_fallback(options.subject_fallback);
		let channel_key =
			ChannelKeyAuthenticator::new(managers.secrets.clone(), options.channel_key.clone());
		Self {
			identity,
			managers,
			channel_key,
			options,
		}
	}

	pub fn options(&self) -> &PolicyOptions {
		&self.options
	}

	pub fn identity(&self) -> &IdentityResolver {
		&self.identity
	}

	pub fn channel_key(&self) -> &ChannelKeyAuthenticator {
		&self.channel_key
	}

	/// Evaluate one requirement.
	#[instrument(
		level = "debug",
		skip_all,
		fields(
			request_id = %ctx.request_id(),
			requirement = %requirement,
			resource_kind = resource.map(|r| r.kind().as_str()).unwrap_or("none"),
			user_id = field::Empty,
		)
	)]
	pub async fn evaluate(
		&self,
		ctx: &RequestContext,
		requirement: Requirement,
		principal: &Principal,
		resource: Option<&dyn AuthzResource>,
	) -> Decision {
		match self.check(ctx, requirement, principal, resource).await {
			Ok(()) => {
				debug!(outcome = "allowed", "requirement satisfied");
				Decision::allow()
			}
			Err(e) => {
				let decision = Decision::deny(requirement, &e);
				if e.is_operational() {
					warn!(outcome = "denied", failure_kind = %e.kind(), error = %e, "requirement denied by error");
				} else {
					debug!(outcome = "denied", failure_kind = %e.kind(), reason = %e, "requirement not satisfied");
				}
				decision
			}
		}
	}

	/// Shorthand for `evaluate(..).succeeded`.
	pub async fn is_allowed(
		&self,
		ctx: &RequestContext,
		requirement: Requirement,
		principal: &Principal,
		resource: Option<&dyn AuthzResource>,
	) -> bool {
		self
			.evaluate(ctx, requirement, principal, resource)
			.await
			.succeeded
	}

	async fn check(
		&self,
		ctx: &RequestContext,
		requirement: Requirement,
		principal: &Principal,
		resource: Option<&dyn AuthzResource>,
	) -> Result<(), AuthzError> {
		if requirement == Requirement::ChannelKey {
			return self.channel_key.authenticate(ctx).await.map_err(AuthzError::from);
		}

		let user = self.identity.resolve(ctx, principal).await?;
		Span::current().record("user_id", field::display(user.id));

		if requirement.admin_satisfies() && user.is_site_admin {
			debug!("site admin");
			return Ok(());
		}

		if !requirement.needs_resource() {
			return match requirement {
				Requirement::ValidUser => Ok(()),
				// IsAdmin for a non-admin. ChannelKey returned early above.
				_ => Err(AuthzError::PermissionDenied(requirement)),
			};
		}
		let resource = resource.ok_or(AuthzError::MissingResource(requirement))?;

		match requirement {
			Requirement::OwnsEntity | Requirement::OwnsEntityOrIsAdmin => {
				ownership::owns_entity(requirement, &user, resource)
			}
			Requirement::IsEventLead => self.is_event_lead(ctx, &user, resource).await,
			Requirement::IsEventLeadOrIsAdmin => {
				self.is_event_lead_or_admin(ctx, &user, resource).await
			}
			Requirement::IsPartnerUserOrIsAdmin => self.is_partner_user(ctx, &user, resource).await,
			Requirement::IsProfessionalCompanyUserOrIsAdmin => {
				self.is_company_user(ctx, &user, resource).await
			}
			Requirement::ValidUser | Requirement::IsAdmin | Requirement::ChannelKey => {
				Err(AuthzError::PermissionDenied(requirement))
			}
		}
	}
}
