// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource-level authorization for cleanup events.
//!
//! This crate decides whether an authenticated caller may perform an operation
//! on a resource. It covers:
//!
//! - **Identity**: resolving validated claims to a directory user
//! - **Resources**: a capability trait exposing creator, owning event,
//!   partner and company facets
//! - **Requirements**: ownership, admin, event lead and membership predicates
//! - **Channel keys**: shared-secret headers for automation callers
//!
//! # Fail closed
//!
//! [`PolicyEngine::evaluate`] always returns a [`Decision`]. Missing claims,
//! unknown users, unrecognized resources, upstream failures, cancellation and
//! expired deadlines all produce a denial with a [`FailureReason`] attached.
//!
//! # Example
//!
//! ```ignore
//! use cleanup_server_authz::{PolicyEngine, Principal, RequestContext, Requirement};
//!
//! let ctx = RequestContext::new().with_timeout(Duration::from_secs(2));
//! let principal = Principal::with_email("alice@example.com");
//!
//! let decision = engine
//!     .evaluate(&ctx, Requirement::IsEventLead, &principal, Some(&attendee))
//!     .await;
//! if !decision.succeeded {
//!     return Err(StatusCode::FORBIDDEN);
//! }
//! ```

pub mod channel_key;
pub mod claims;
pub mod context;
pub mod decision;
pub mod error;
pub mod identity;
pub mod managers;
pub mod policy;
pub mod requirement;
pub mod resource;
pub mod types;
pub mod user;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use channel_key::{ChannelKeyAuthenticator, ChannelKeyConfig, ChannelKeyError};
pub use claims::{Claim, ClaimSet, Principal};
pub use context::RequestContext;
pub use decision::{Decision, FailureReason};
pub use error::{AuthzError, FailureKind, LookupError, ResourceFacet, SecretStoreError};
pub use identity::IdentityResolver;
pub use managers::{
	CompanyMembership, EventRoster, EventStore, Managers, PartnerMembership, SecretStore,
	UserDirectory,
};
pub use policy::{CreatorCheck, PolicyEngine, PolicyOptions, UnknownCreatorCheck};
pub use requirement::{Requirement, UnknownRequirement};
pub use resource::{
	event_id_of, AuthzResource, DynamicResource, Event, EventAttendee, EventAttendeeMetrics,
	EventAttendeeRoute, EventPartnerLocationService, EventSummary, LitterReport, Partner,
	PartnerLocation, PickupLocation, ProfessionalCompany, ResourceKind, UserNotification,
};
pub use types::{CompanyId, EventId, PartnerId, UserId};
pub use user::InternalUser;
