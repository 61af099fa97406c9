// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization configuration section.

use cleanup_server_authz::channel_key::{
	DEFAULT_CHANNEL_KEY_HEADER, DEFAULT_CHANNEL_KEY_SECRET, DEFAULT_SERVICE_KEY_HEADER,
	DEFAULT_SERVICE_KEY_SECRET,
};
use cleanup_server_authz::CreatorCheck;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthzConfigLayer {
	pub subject_fallback: Option<bool>,
	pub lead_or_admin_creator_check: Option<CreatorCheck>,
	pub lookup_timeout_ms: Option<u64>,
	pub channel_key_header: Option<String>,
	pub service_key_header: Option<String>,
	pub channel_key_secret: Option<String>,
	pub service_key_secret: Option<String>,
}

impl AuthzConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.subject_fallback.is_some() {
			self.subject_fallback = other.subject_fallback;
		}
		if other.lead_or_admin_creator_check.is_some() {
			self.lead_or_admin_creator_check = other.lead_or_admin_creator_check;
		}
		if other.lookup_timeout_ms.is_some() {
			self.lookup_timeout_ms = other.lookup_timeout_ms;
		}
		if other.channel_key_header.is_some() {
			self.channel_key_header = other.channel_key_header;
		}
		if other.service_key_header.is_some() {
			self.service_key_header = other.service_key_header;
		}
		if other.channel_key_secret.is_some() {
			self.channel_key_secret = other.channel_key_secret;
		}
		if other.service_key_secret.is_some() {
			self.service_key_secret = other.service_key_secret;
		}
	}

	pub fn finalize(self) -> AuthzConfig {
		AuthzConfig {
			subject_fallback: self.subject_fallback.unwrap_or(false),
			lead_or_admin_creator_check: self.lead_or_admin_creator_check.unwrap_or_default(),
			lookup_timeout_ms: self.lookup_timeout_ms.unwrap_or(DEFAULT_LOOKUP_TIMEOUT_MS),
			channel_key_header: self
				.channel_key_header
				.unwrap_or_else(|| DEFAULT_CHANNEL_KEY_HEADER.to_string()),
			service_key_header: self
				.service_key_header
				.unwrap_or_else(|| DEFAULT_SERVICE_KEY_HEADER.to_string()),
			channel_key_secret: self
				.channel_key_secret
				.unwrap_or_else(|| DEFAULT_CHANNEL_KEY_SECRET.to_string()),
			service_key_secret: self
				.service_key_secret
				.unwrap_or_else(|| DEFAULT_SERVICE_KEY_SECRET.to_string()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthzConfig {
	/// Resolve principals without an email claim through their subject.
	pub subject_fallback: bool,
	pub lead_or_admin_creator_check: CreatorCheck,
	/// Upper bound on all lookups for one request, in milliseconds.
	pub lookup_timeout_ms: u64,
	pub channel_key_header: String,
	pub service_key_header: String,
	/// Secret store names, not the secrets themselves.
	pub channel_key_secret: String,
	pub service_key_secret: String,
}

impl Default for AuthzConfig {
	fn default() -> Self {
		AuthzConfigLayer::default().finalize()
	}
}
