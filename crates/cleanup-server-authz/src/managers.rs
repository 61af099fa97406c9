// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only data sources consulted during evaluation.
//!
//! Each trait is implemented elsewhere (by the persistence layer in
//! production, by [`crate::testing::InMemoryStore`] in tests). Nothing here
//! ever writes.

use std::sync::Arc;

use async_trait::async_trait;
use cleanup_common_secret::SecretString;

use crate::error::{LookupError, SecretStoreError};
use crate::resource::Event;
use crate::types::{CompanyId, EventId, PartnerId, UserId};
use crate::user::InternalUser;

#[async_trait]
pub trait UserDirectory: Send + Sync {
	/// Case sensitivity is the directory's decision.
	async fn find_user_by_email(&self, email: &str) -> Result<Option<InternalUser>, LookupError>;

	/// Look up by the identity provider's subject identifier.
	async fn find_user_by_external_id(
		&self,
		external_id: &str,
	) -> Result<Option<InternalUser>, LookupError>;
}

#[async_trait]
pub trait EventRoster: Send + Sync {
	/// True if the user is an active lead or co-lead on the event's roster.
	async fn is_event_lead(&self, event_id: &EventId, user_id: &UserId) -> Result<bool, LookupError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
	/// Load the event straight from storage, bypassing any change-tracking or
	/// caching layer.
	async fn get_event_uncached(&self, event_id: &EventId) -> Result<Option<Event>, LookupError>;
}

#[async_trait]
pub trait PartnerMembership: Send + Sync {
	/// True if the user holds an active partner-admin record for the partner.
	async fn is_partner_member(
		&self,
		partner_id: &PartnerId,
		user_id: &UserId,
	) -> Result<bool, LookupError>;
}

#[async_trait]
pub trait CompanyMembership: Send + Sync {
	async fn is_company_member(
		&self,
		company_id: &CompanyId,
		user_id: &UserId,
	) -> Result<bool, LookupError>;
}

#[async_trait]
pub trait SecretStore: Send + Sync {
	async fn get_secret(&self, name: &str) -> Result<SecretString, SecretStoreError>;
}

/// The full set of collaborators the policy engine needs.
#[derive(Clone)]
pub struct Managers {
	pub users: Arc<dyn UserDirectory>,
	pub roster: Arc<dyn EventRoster>,
	pub events: Arc<dyn EventStore>,
	pub partners: Arc<dyn PartnerMembership>,
	pub companies: Arc<dyn CompanyMembership>,
	pub secrets: Arc<dyn SecretStore>,
}

impl Managers {
	/// Use one value for every role. Handy when a single store backs all of
	/// them, as the in-memory test store does.
	pub fn from_shared<S>(store: Arc<S>) -> Self
	where
		S: UserDirectory
			+ EventRoster
			+ EventStore
			+ PartnerMembership
			+ CompanyMembership
			+ SecretStore
			+ 'static,
	{
		Self {
			users: store.clone(),
			roster: store.clone(),
			events: store.clone(),
			partners: store.clone(),
			companies: store.clone(),
			secrets: store,
		}
	}
}

impl std::fmt::Debug for Managers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Managers").finish_non_exhaustive()
	}
}
