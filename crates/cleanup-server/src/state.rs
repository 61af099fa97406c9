// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared application state for the authorization middleware.

use std::sync::Arc;
use std::time::Duration;

use cleanup_server_authz::{ChannelKeyConfig, Managers, PolicyEngine, PolicyOptions};
use cleanup_server_config::{AuthzConfig, ServerConfig};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
	pub policy: Arc<PolicyEngine>,
	/// Budget for all authorization lookups made by one request.
	pub lookup_timeout: Duration,
	/// Parent of every per-request cancellation token.
	pub shutdown: CancellationToken,
}

impl AppState {
	pub fn new(policy: PolicyEngine, lookup_timeout: Duration) -> Self {
		Self {
			policy: Arc::new(policy),
			lookup_timeout,
			shutdown: CancellationToken::new(),
		}
	}

	pub fn from_config(config: &ServerConfig, managers: Managers) -> Self {
		let policy = PolicyEngine::new(managers, policy_options(&config.authz));
		Self::new(policy, config.lookup_timeout())
	}

	/// Cancel in-flight lookups when `shutdown` fires.
	pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
		self.shutdown = shutdown;
		self
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("policy", &self.policy)
			.field("lookup_timeout", &self.lookup_timeout)
			.finish_non_exhaustive()
	}
}

pub fn policy_options(config: &AuthzConfig) -> PolicyOptions {
	PolicyOptions {
		lead_or_admin_creator_check: config.lead_or_admin_creator_check,
		subject_fallback: config.subject_fallback,
		channel_key: ChannelKeyConfig {
			channel_key_header: config.channel_key_header.clone(),
			service_key_header: config.service_key_header.clone(),
			channel_key_secret: config.channel_key_secret.clone(),
			service_key_secret: config.service_key_secret.clone(),
		},
	}
}
