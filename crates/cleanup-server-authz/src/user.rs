// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The internal user record owned by the user directory.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A user as stored in the directory.
///
/// Records are looked up fresh on every evaluation that needs one; only the
/// id is remembered for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalUser {
	pub id: UserId,
	pub email: String,
	pub user_name: String,
	pub is_site_admin: bool,
}

impl InternalUser {
	pub fn new(id: UserId, email: impl Into<String>) -> Self {
		let email = email.into();
		let user_name = email
			.split_once('@')
			.map(|(local, _)| local.to_string())
			.unwrap_or_else(|| email.clone());
		Self {
			id,
			email,
			user_name,
			is_site_admin: false,
		}
	}

	/// Builder: set the display user name.
	pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
		self.user_name = user_name.into();
		self
	}

	/// Builder: grant site admin.
	pub fn site_admin(mut self) -> Self {
		self.is_site_admin = true;
		self
	}
}
