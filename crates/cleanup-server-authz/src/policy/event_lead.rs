// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event lead requirements.
//!
//! A user leads an event if they created it or the roster lists them as a
//! lead or co-lead. `IsEventLead` only trusts the event as loaded from the
//! store, never the creator field on the submitted resource.

use tracing::debug;

use super::{CreatorCheck, PolicyEngine};
use crate::context::RequestContext;
use crate::error::{AuthzError, ResourceFacet};
use crate::requirement::Requirement;
use crate::resource::{event_id_of, AuthzResource};
use crate::types::{EventId, UserId};
use crate::user::InternalUser;

impl PolicyEngine {
	pub(super) async fn is_event_lead(
		&self,
		ctx: &RequestContext,
		user: &InternalUser,
		resource: &dyn AuthzResource,
	) -> Result<(), AuthzError> {
		let event_id = owning_event(resource)?;
		if self.authoritative_creator(ctx, &event_id).await? == user.id {
			debug!(%event_id, "event creator");
			return Ok(());
		}
		self
			.roster_lead(ctx, &event_id, &user.id, Requirement::IsEventLead)
			.await
	}

	pub(super) async fn is_event_lead_or_admin(
		&self,
		ctx: &RequestContext,
		user: &InternalUser,
		resource: &dyn AuthzResource,
	) -> Result<(), AuthzError> {
		let event_id = owning_event(resource)?;
		let creator = match self.options.lead_or_admin_creator_check {
			CreatorCheck::ResourceField => resource.created_by_user_id(),
			CreatorCheck::Authoritative => Some(self.authoritative_creator(ctx, &event_id).await?),
		};
		if creator == Some(user.id) {
			debug!(%event_id, "resource creator");
			return Ok(());
		}
		self
			.roster_lead(ctx, &event_id, &user.id, Requirement::IsEventLeadOrIsAdmin)
			.await
	}

	/// Creator of the event as stored, read without any caching layer.
	async fn authoritative_creator(
		&self,
		ctx: &RequestContext,
		event_id: &EventId,
	) -> Result<UserId, AuthzError> {
		let event = ctx
			.guard(self.managers.events.get_event_uncached(event_id))
			.await?
			.ok_or(AuthzError::EventNotFound(*event_id))?;
		Ok(event.created_by_user_id)
	}

	async fn roster_lead(
		&self,
		ctx: &RequestContext,
		event_id: &EventId,
		user_id: &UserId,
		requirement: Requirement,
	) -> Result<(), AuthzError> {
		if ctx
			.guard(self.managers.roster.is_event_lead(event_id, user_id))
			.await?
		{
			debug!(%event_id, "delegated lead");
			Ok(())
		} else {
			Err(AuthzError::PermissionDenied(requirement))
		}
	}
}

fn owning_event(resource: &dyn AuthzResource) -> Result<EventId, AuthzError> {
	event_id_of(resource).ok_or(AuthzError::ResourceTypeUnrecognized {
		kind: resource.kind(),
		facet: ResourceFacet::Event,
	})
}
