// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory implementations of every manager trait.
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! downstream crates' tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cleanup_common_secret::SecretString;

use crate::error::{LookupError, SecretStoreError};
use crate::managers::{
	CompanyMembership, EventRoster, EventStore, PartnerMembership, SecretStore, UserDirectory,
};
use crate::resource::Event;
use crate::types::{CompanyId, EventId, PartnerId, UserId};
use crate::user::InternalUser;

#[derive(Default)]
struct Tables {
	users: HashMap<UserId, InternalUser>,
	external_ids: HashMap<String, UserId>,
	events: HashMap<EventId, Event>,
	leads: HashSet<(EventId, UserId)>,
	partner_members: HashSet<(PartnerId, UserId)>,
	company_members: HashSet<(CompanyId, UserId)>,
	secrets: HashMap<String, String>,
}

/// One store backing all six manager roles.
#[derive(Default)]
pub struct InMemoryStore {
	tables: Mutex<Tables>,
	fail_lookups: AtomicBool,
	fail_secrets: AtomicBool,
	lookup_delay: Mutex<Option<Duration>>,
	lookups: AtomicUsize,
}

impl InMemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn tables(&self) -> MutexGuard<'_, Tables> {
		self.tables.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn add_user(&self, user: InternalUser) -> InternalUser {
		self.tables().users.insert(user.id, user.clone());
		user
	}

	pub fn link_external_id(&self, external_id: impl Into<String>, user_id: UserId) {
		self.tables().external_ids.insert(external_id.into(), user_id);
	}

	pub fn add_event(&self, event: Event) -> Event {
		self.tables().events.insert(event.id, event.clone());
		event
	}

	pub fn add_lead(&self, event_id: EventId, user_id: UserId) {
		self.tables().leads.insert((event_id, user_id));
	}

	pub fn add_partner_member(&self, partner_id: PartnerId, user_id: UserId) {
		self.tables().partner_members.insert((partner_id, user_id));
	}

	pub fn add_company_member(&self, company_id: CompanyId, user_id: UserId) {
		self.tables().company_members.insert((company_id, user_id));
	}

	pub fn set_secret(&self, name: impl Into<String>, value: impl Into<String>) {
		self.tables().secrets.insert(name.into(), value.into());
	}

	/// Make every user, event, roster and membership lookup fail.
	pub fn fail_lookups(&self, fail: bool) {
		self.fail_lookups.store(fail, Ordering::SeqCst);
	}

	pub fn fail_secrets(&self, fail: bool) {
		self.fail_secrets.store(fail, Ordering::SeqCst);
	}

	/// Delay every lookup, for exercising deadlines and cancellation.
	pub fn set_lookup_delay(&self, delay: Option<Duration>) {
		*self
			.lookup_delay
			.lock()
			.unwrap_or_else(PoisonError::into_inner) = delay;
	}

	/// Number of lookups served so far, secrets excluded.
	pub fn lookup_count(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}

	async fn begin_lookup(&self) -> Result<(), LookupError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		let delay = *self
			.lookup_delay
			.lock()
			.unwrap_or_else(PoisonError::into_inner);
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		if self.fail_lookups.load(Ordering::SeqCst) {
			return Err(LookupError::Unavailable("in-memory store offline".to_string()));
		}
		Ok(())
	}
}

#[async_trait]
impl UserDirectory for InMemoryStore {
	async fn find_user_by_email(&self, email: &str) -> Result<Option<InternalUser>, LookupError> {
		self.begin_lookup().await?;
		Ok(self
			.tables()
			.users
			.values()
			.find(|u| u.email.eq_ignore_ascii_case(email))
			.cloned())
	}

	async fn find_user_by_external_id(
		&self,
		external_id: &str,
	) -> Result<Option<InternalUser>, LookupError> {
		self.begin_lookup().await?;
		let tables = self.tables();
		let user = tables
			.external_ids
			.get(external_id)
			.and_then(|id| tables.users.get(id))
			.cloned();
		Ok(user)
	}
}

#[async_trait]
impl EventRoster for InMemoryStore {
	async fn is_event_lead(&self, event_id: &EventId, user_id: &UserId) -> Result<bool, LookupError> {
		self.begin_lookup().await?;
		Ok(self.tables().leads.contains(&(*event_id, *user_id)))
	}
}

#[async_trait]
impl EventStore for InMemoryStore {
	async fn get_event_uncached(&self, event_id: &EventId) -> Result<Option<Event>, LookupError> {
		self.begin_lookup().await?;
		Ok(self.tables().events.get(event_id).cloned())
	}
}

#[async_trait]
impl PartnerMembership for InMemoryStore {
	async fn is_partner_member(
		&self,
		partner_id: &PartnerId,
		user_id: &UserId,
	) -> Result<bool, LookupError> {
		self.begin_lookup().await?;
		Ok(self
			.tables()
			.partner_members
			.contains(&(*partner_id, *user_id)))
	}
}

#[async_trait]
impl CompanyMembership for InMemoryStore {
	async fn is_company_member(
		&self,
		company_id: &CompanyId,
		user_id: &UserId,
	) -> Result<bool, LookupError> {
		self.begin_lookup().await?;
		Ok(self
			.tables()
			.company_members
			.contains(&(*company_id, *user_id)))
	}
}

#[async_trait]
impl SecretStore for InMemoryStore {
	async fn get_secret(&self, name: &str) -> Result<SecretString, SecretStoreError> {
		if self.fail_secrets.load(Ordering::SeqCst) {
			return Err(SecretStoreError::Unavailable("in-memory vault sealed".to_string()));
		}
		self
			.tables()
			.secrets
			.get(name)
			.map(|v| SecretString::new(v.clone()))
			.ok_or_else(|| SecretStoreError::NotFound(name.to_string()))
	}
}
