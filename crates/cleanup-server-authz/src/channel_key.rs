// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared-secret authentication for machine-to-machine callers.
//!
//! Automation (IFTTT style triggers) sends two headers, a channel key and a
//! service key. Both must be present and both must equal the secrets stored
//! under the configured names. There is no principal and no resource.

use std::sync::Arc;

use http::HeaderMap;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::context::RequestContext;
use crate::error::AuthzError;
use crate::managers::SecretStore;

pub const DEFAULT_CHANNEL_KEY_HEADER: &str = "IFTTT-Channel-Key";
pub const DEFAULT_SERVICE_KEY_HEADER: &str = "IFTTT-Service-Key";
pub const DEFAULT_CHANNEL_KEY_SECRET: &str = "IftttChannelKey";
pub const DEFAULT_SERVICE_KEY_SECRET: &str = "IftttServiceKey";

/// Rejection reasons. The `Display` text is the message returned to callers.
#[derive(Debug, Error)]
pub enum ChannelKeyError {
	#[error("Missing channel key header.")]
	MissingChannelKey,

	#[error("Missing service key header.")]
	MissingServiceKey,

	#[error("Invalid channel or service key.")]
	Mismatch,

	/// The secret store failed or the request was cancelled. The cause is
	/// kept for logging but never shown to the caller.
	#[error("A server error has occurred.")]
	Internal(Box<AuthzError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelKeyConfig {
	pub channel_key_header: String,
	pub service_key_header: String,
	pub channel_key_secret: String,
	pub service_key_secret: String,
}

impl Default for ChannelKeyConfig {
	fn default() -> Self {
		Self {
			channel_key_header: DEFAULT_CHANNEL_KEY_HEADER.to_string(),
			service_key_header: DEFAULT_SERVICE_KEY_HEADER.to_string(),
			channel_key_secret: DEFAULT_CHANNEL_KEY_SECRET.to_string(),
			service_key_secret: DEFAULT_SERVICE_KEY_SECRET.to_string(),
		}
	}
}

#[derive(Clone)]
pub struct ChannelKeyAuthenticator {
	secrets: Arc<dyn SecretStore>,
	config: ChannelKeyConfig,
}

impl ChannelKeyAuthenticator {
	pub fn new(secrets: Arc<dyn SecretStore>, config: ChannelKeyConfig) -> Self {
		Self { secrets, config }
	}

	pub fn config(&self) -> &ChannelKeyConfig {
		&self.config
	}

	/// Check the channel and service key headers on `ctx`.
	#[instrument(level = "debug", skip_all, fields(request_id = %ctx.request_id()))]
	pub async fn authenticate(&self, ctx: &RequestContext) -> Result<(), ChannelKeyError> {
		let headers = ctx.headers();
		let channel_key = header_value(headers, &self.config.channel_key_header)
			.ok_or(ChannelKeyError::MissingChannelKey)?;
		let service_key = header_value(headers, &self.config.service_key_header)
			.ok_or(ChannelKeyError::MissingServiceKey)?;

		let fetched = tokio::try_join!(
			ctx.guard(self.secrets.get_secret(&self.config.channel_key_secret)),
			ctx.guard(self.secrets.get_secret(&self.config.service_key_secret)),
		);
		let (expected_channel, expected_service) = match fetched {
			Ok(pair) => pair,
			Err(e) => {
				error!(error = %e, "failed to load channel key secrets");
				return Err(ChannelKeyError::Internal(Box::new(e)));
			}
		};

		// Both comparisons always run.
		let channel_ok = expected_channel.matches(channel_key);
		let service_ok = expected_service.matches(service_key);
		if channel_ok & service_ok {
			debug!("channel key accepted");
			Ok(())
		} else {
			debug!(channel_ok, service_ok, "channel key mismatch");
			Err(ChannelKeyError::Mismatch)
		}
	}
}

impl std::fmt::Debug for ChannelKeyAuthenticator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChannelKeyAuthenticator")
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

/// Raw bytes of a header. Empty values count as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a [u8]> {
	headers
		.get(name)
		.map(|v| v.as_bytes())
		.filter(|v| !v.is_empty())
}
