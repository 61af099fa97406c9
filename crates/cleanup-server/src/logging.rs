// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use cleanup_server_config::{LogFormat, LoggingConfig};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
	let json = config.format == LogFormat::Json;

	tracing_subscriber::registry()
		.with(filter)
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json).then(tracing_subscriber::fmt::layer))
		.try_init()
}
