// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::AuthzError;
use crate::requirement::Requirement;
use crate::resource::AuthzResource;
use crate::user::InternalUser;

/// The resolved user created the resource. A resource without a creator
/// can never be owned.
pub(super) fn owns_entity(
	requirement: Requirement,
	user: &InternalUser,
	resource: &dyn AuthzResource,
) -> Result<(), AuthzError> {
	match resource.created_by_user_id() {
		Some(creator) if creator == user.id => Ok(()),
		_ => Err(AuthzError::PermissionDenied(requirement)),
	}
}
