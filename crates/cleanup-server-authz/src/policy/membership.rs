// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use super::PolicyEngine;
use crate::context::RequestContext;
use crate::error::{AuthzError, ResourceFacet};
use crate::requirement::Requirement;
use crate::resource::AuthzResource;
use crate::user::InternalUser;

impl PolicyEngine {
	/// Active partner-admin membership for the resource's partner.
	pub(super) async fn is_partner_user(
		&self,
		ctx: &RequestContext,
		user: &InternalUser,
		resource: &dyn AuthzResource,
	) -> Result<(), AuthzError> {
		let partner_id = resource
			.partner_id()
			.ok_or(AuthzError::ResourceTypeUnrecognized {
				kind: resource.kind(),
				facet: ResourceFacet::Partner,
			})?;
		let member = ctx
			.guard(self.managers.partners.is_partner_member(&partner_id, &user.id))
			.await?;
		if member {
			Ok(())
		} else {
			Err(AuthzError::PermissionDenied(Requirement::IsPartnerUserOrIsAdmin))
		}
	}

	/// Registered user of the resource's professional company.
	pub(super) async fn is_company_user(
		&self,
		ctx: &RequestContext,
		user: &InternalUser,
		resource: &dyn AuthzResource,
	) -> Result<(), AuthzError> {
		let company_id = resource
			.company_id()
			.ok_or(AuthzError::ResourceTypeUnrecognized {
				kind: resource.kind(),
				facet: ResourceFacet::Company,
			})?;
		let member = ctx
			.guard(self.managers.companies.is_company_member(&company_id, &user.id))
			.await?;
		if member {
			Ok(())
		} else {
			Err(AuthzError::PermissionDenied(
				Requirement::IsProfessionalCompanyUserOrIsAdmin,
			))
		}
	}
}
