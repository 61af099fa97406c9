// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A named, independently evaluable authorization predicate.
///
/// There is no composition across variants; the `OrIsAdmin` variants are the
/// only built-in disjunctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
	ValidUser,
	IsAdmin,
	OwnsEntity,
	OwnsEntityOrIsAdmin,
	IsEventLead,
	IsEventLeadOrIsAdmin,
	IsPartnerUserOrIsAdmin,
	IsProfessionalCompanyUserOrIsAdmin,
	ChannelKey,
}

impl Requirement {
	pub const ALL: [Requirement; 9] = [
		Requirement::ValidUser,
		Requirement::IsAdmin,
		Requirement::OwnsEntity,
		Requirement::OwnsEntityOrIsAdmin,
		Requirement::IsEventLead,
		Requirement::IsEventLeadOrIsAdmin,
		Requirement::IsPartnerUserOrIsAdmin,
		Requirement::IsProfessionalCompanyUserOrIsAdmin,
		Requirement::ChannelKey,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Requirement::ValidUser => "ValidUser",
			Requirement::IsAdmin => "IsAdmin",
			Requirement::OwnsEntity => "OwnsEntity",
			Requirement::OwnsEntityOrIsAdmin => "OwnsEntityOrIsAdmin",
			Requirement::IsEventLead => "IsEventLead",
			Requirement::IsEventLeadOrIsAdmin => "IsEventLeadOrIsAdmin",
			Requirement::IsPartnerUserOrIsAdmin => "IsPartnerUserOrIsAdmin",
			Requirement::IsProfessionalCompanyUserOrIsAdmin => "IsProfessionalCompanyUserOrIsAdmin",
			Requirement::ChannelKey => "ChannelKey",
		}
	}

	/// Whether a site admin satisfies this requirement outright.
	pub fn admin_satisfies(&self) -> bool {
		matches!(
			self,
			Requirement::IsAdmin
				| Requirement::OwnsEntityOrIsAdmin
				| Requirement::IsEventLeadOrIsAdmin
				| Requirement::IsPartnerUserOrIsAdmin
				| Requirement::IsProfessionalCompanyUserOrIsAdmin
		)
	}

	/// Whether evaluation needs a target resource.
	pub fn needs_resource(&self) -> bool {
		!matches!(
			self,
			Requirement::ValidUser | Requirement::IsAdmin | Requirement::ChannelKey
		)
	}
}

impl fmt::Display for Requirement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown requirement: {0}")]
pub struct UnknownRequirement(pub String);

impl FromStr for Requirement {
	type Err = UnknownRequirement;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		Requirement::ALL
			.into_iter()
			.find(|r| r.as_str() == trimmed)
			.ok_or_else(|| UnknownRequirement(s.to_string()))
	}
}
