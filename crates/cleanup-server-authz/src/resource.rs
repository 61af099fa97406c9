// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resources that requirements are evaluated against.
//!
//! Resources don't share a type hierarchy. Instead every resource implements
//! the [`AuthzResource`] capability trait and exposes only the facets it
//! actually carries:
//!
//! | Facet | Used by |
//! |-------|---------|
//! | [`created_by_user_id`](AuthzResource::created_by_user_id) | `OwnsEntity`, `IsEventLeadOrIsAdmin` |
//! | [`owning_event_id`](AuthzResource::owning_event_id) | `IsEventLead`, `IsEventLeadOrIsAdmin` |
//! | [`partner_id`](AuthzResource::partner_id) | `IsPartnerUserOrIsAdmin` |
//! | [`company_id`](AuthzResource::company_id) | `IsProfessionalCompanyUserOrIsAdmin` |
//!
//! New resource types join by implementing the trait. Payloads whose Rust type
//! isn't known at compile time can be wrapped in a [`DynamicResource`], which
//! inspects the JSON for the conventional field names instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::trace;
use uuid::Uuid;

use crate::types::{CompanyId, EventId, PartnerId, UserId};

/// Resource kinds, used for logging and failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	Event,
	EventAttendee,
	EventAttendeeRoute,
	EventAttendeeMetrics,
	LitterReport,
	EventPartnerLocationService,
	PickupLocation,
	UserNotification,
	EventSummary,
	Partner,
	PartnerLocation,
	ProfessionalCompany,
	/// Anything outside the list above.
	Other,
}

impl ResourceKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ResourceKind::Event => "event",
			ResourceKind::EventAttendee => "event_attendee",
			ResourceKind::EventAttendeeRoute => "event_attendee_route",
			ResourceKind::EventAttendeeMetrics => "event_attendee_metrics",
			ResourceKind::LitterReport => "litter_report",
			ResourceKind::EventPartnerLocationService => "event_partner_location_service",
			ResourceKind::PickupLocation => "pickup_location",
			ResourceKind::UserNotification => "user_notification",
			ResourceKind::EventSummary => "event_summary",
			ResourceKind::Partner => "partner",
			ResourceKind::PartnerLocation => "partner_location",
			ResourceKind::ProfessionalCompany => "professional_company",
			ResourceKind::Other => "other",
		}
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Capability contract every protected resource implements.
///
/// Accessors default to `None`; a resource only overrides the facets it has.
pub trait AuthzResource: Send + Sync {
	fn kind(&self) -> ResourceKind;

	/// The user that created this record, as stored on the record itself.
	fn created_by_user_id(&self) -> Option<UserId> {
		None
	}

	/// The event this record belongs to. An [`Event`] returns its own id.
	fn owning_event_id(&self) -> Option<EventId> {
		None
	}

	fn partner_id(&self) -> Option<PartnerId> {
		None
	}

	fn company_id(&self) -> Option<CompanyId> {
		None
	}
}

/// Extract the owning event id of any resource.
pub fn event_id_of(resource: &dyn AuthzResource) -> Option<EventId> {
	let event_id = resource.owning_event_id();
	if event_id.is_none() {
		trace!(resource_kind = %resource.kind(), "resource carries no owning event");
	}
	event_id
}

// =============================================================================
// Event-scoped records
// =============================================================================

/// A cleanup event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	pub id: EventId,
	pub name: String,
	pub event_date: DateTime<Utc>,
	pub created_by_user_id: UserId,
	pub is_cancelled: bool,
}

impl Event {
	pub fn new(id: EventId, name: impl Into<String>, created_by_user_id: UserId) -> Self {
		Self {
			id,
			name: name.into(),
			event_date: Utc::now(),
			created_by_user_id,
			is_cancelled: false,
		}
	}
}

impl AuthzResource for Event {
	fn kind(&self) -> ResourceKind {
		ResourceKind::Event
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.id)
	}
}

/// Roster row linking a user to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
	pub event_id: EventId,
	pub user_id: UserId,
	pub is_event_lead: bool,
	pub created_by_user_id: UserId,
}

impl AuthzResource for EventAttendee {
	fn kind(&self) -> ResourceKind {
		ResourceKind::EventAttendee
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

/// A route walked by an attendee during an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendeeRoute {
	pub id: Uuid,
	pub event_id: EventId,
	pub user_id: UserId,
	pub created_by_user_id: UserId,
}

impl AuthzResource for EventAttendeeRoute {
	fn kind(&self) -> ResourceKind {
		ResourceKind::EventAttendeeRoute
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

/// Per-attendee collection totals submitted after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendeeMetrics {
	pub id: Uuid,
	pub event_id: EventId,
	pub user_id: UserId,
	pub bags_collected: u32,
	pub created_by_user_id: UserId,
}

impl AuthzResource for EventAttendeeMetrics {
	fn kind(&self) -> ResourceKind {
		ResourceKind::EventAttendeeMetrics
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

/// A litter report attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LitterReport {
	pub id: Uuid,
	pub event_id: EventId,
	pub name: String,
	pub created_by_user_id: UserId,
}

impl AuthzResource for LitterReport {
	fn kind(&self) -> ResourceKind {
		ResourceKind::LitterReport
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

/// A partner location service requested for an event (hauling, supplies).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPartnerLocationService {
	pub event_id: EventId,
	pub partner_location_id: Uuid,
	pub service_type_id: i32,
	pub created_by_user_id: UserId,
}

impl AuthzResource for EventPartnerLocationService {
	fn kind(&self) -> ResourceKind {
		ResourceKind::EventPartnerLocationService
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

/// Where collected bags wait for hauler pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupLocation {
	pub id: Uuid,
	pub event_id: EventId,
	pub name: String,
	pub latitude: f64,
	pub longitude: f64,
	pub created_by_user_id: UserId,
}

impl AuthzResource for PickupLocation {
	fn kind(&self) -> ResourceKind {
		ResourceKind::PickupLocation
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

/// A notification sent to a user about an event. Generated by the system,
/// so it has no creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotification {
	pub id: Uuid,
	pub event_id: EventId,
	pub user_id: UserId,
	pub notification_type: i32,
	pub sent_at: DateTime<Utc>,
}

impl AuthzResource for UserNotification {
	fn kind(&self) -> ResourceKind {
		ResourceKind::UserNotification
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

/// Post-event summary filled in by the lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
	pub event_id: EventId,
	pub actual_number_of_attendees: u32,
	pub number_of_bags: u32,
	pub duration_in_minutes: u32,
	pub created_by_user_id: UserId,
}

impl AuthzResource for EventSummary {
	fn kind(&self) -> ResourceKind {
		ResourceKind::EventSummary
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn owning_event_id(&self) -> Option<EventId> {
		Some(self.event_id)
	}
}

// =============================================================================
// Partner and company records
// =============================================================================

/// A partner organization (city, business, non-profit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
	pub id: PartnerId,
	pub name: String,
	pub created_by_user_id: UserId,
}

impl AuthzResource for Partner {
	fn kind(&self) -> ResourceKind {
		ResourceKind::Partner
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn partner_id(&self) -> Option<PartnerId> {
		Some(self.id)
	}
}

/// A physical location operated by a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerLocation {
	pub id: Uuid,
	pub partner_id: PartnerId,
	pub name: String,
	pub is_active: bool,
	pub created_by_user_id: UserId,
}

impl AuthzResource for PartnerLocation {
	fn kind(&self) -> ResourceKind {
		ResourceKind::PartnerLocation
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn partner_id(&self) -> Option<PartnerId> {
		Some(self.partner_id)
	}
}

/// A professional cleanup company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalCompany {
	pub id: CompanyId,
	pub name: String,
	pub created_by_user_id: UserId,
}

impl AuthzResource for ProfessionalCompany {
	fn kind(&self) -> ResourceKind {
		ResourceKind::ProfessionalCompany
	}

	fn created_by_user_id(&self) -> Option<UserId> {
		Some(self.created_by_user_id)
	}

	fn company_id(&self) -> Option<CompanyId> {
		Some(self.id)
	}
}

// =============================================================================
// Structural fallback
// =============================================================================

/// Field names accepted as the owning event id on a [`DynamicResource`].
pub const EVENT_ID_FIELDS: &[&str] = &["eventId", "EventId", "event_id"];

/// A resource known only by its JSON payload.
///
/// Only the owning-event facet is read from the payload. Ownership,
/// partner and company facets are never inferred from untyped data.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicResource {
	type_name: String,
	payload: Value,
}

impl DynamicResource {
	pub fn new(type_name: impl Into<String>, payload: Value) -> Self {
		Self {
			type_name: type_name.into(),
			payload,
		}
	}

	/// Wrap any serializable value.
	pub fn from_serializable<T: Serialize>(
		type_name: impl Into<String>,
		value: &T,
	) -> Result<Self, serde_json::Error> {
		Ok(Self::new(type_name, serde_json::to_value(value)?))
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn payload(&self) -> &Value {
		&self.payload
	}
}

impl AuthzResource for DynamicResource {
	fn kind(&self) -> ResourceKind {
		ResourceKind::Other
	}

	/// The first conventional field present decides; a present field that
	/// doesn't hold a UUID string yields `None` rather than trying the next.
	fn owning_event_id(&self) -> Option<EventId> {
		let object = self.payload.as_object()?;
		let value = EVENT_ID_FIELDS.iter().find_map(|name| object.get(*name))?;
		let parsed = value.as_str().and_then(|s| s.parse::<EventId>().ok());
		if parsed.is_none() {
			trace!(type_name = %self.type_name, "event id field present but not a UUID");
		}
		parsed
	}
}
