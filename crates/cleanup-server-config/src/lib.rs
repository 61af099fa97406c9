// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the cleanup server's authorization layer.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`CLEANUP_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use cleanup_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("lookups time out after {}ms", config.authz.lookup_timeout_ms);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::time::Duration;

use http::HeaderName;
use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
	pub authz: AuthzConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	pub fn lookup_timeout(&self) -> Duration {
		Duration::from_millis(self.authz.lookup_timeout_ms)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CLEANUP_SERVER_*`)
/// 2. Config file (`/etc/cleanup/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge `sources` in precedence order and finalize.
pub fn load_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let authz = layer.authz.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&authz)?;

	info!(
		subject_fallback = authz.subject_fallback,
		creator_check = %authz.lead_or_admin_creator_check,
		lookup_timeout_ms = authz.lookup_timeout_ms,
		channel_key_header = %authz.channel_key_header,
		service_key_header = %authz.service_key_header,
		"Server configuration loaded"
	);

	Ok(ServerConfig { authz, logging })
}

/// Validate cross-field configuration rules.
fn validate_config(authz: &AuthzConfig) -> Result<(), ConfigError> {
	if authz.lookup_timeout_ms == 0 {
		return Err(ConfigError::Validation(
			"authz.lookup_timeout_ms must be greater than zero".to_string(),
		));
	}

	for (key, value) in [
		("authz.channel_key_header", &authz.channel_key_header),
		("authz.service_key_header", &authz.service_key_header),
		("authz.channel_key_secret", &authz.channel_key_secret),
		("authz.service_key_secret", &authz.service_key_secret),
	] {
		if value.trim().is_empty() {
			return Err(ConfigError::Validation(format!("{key} must not be empty")));
		}
	}

	for (key, value) in [
		("authz.channel_key_header", &authz.channel_key_header),
		("authz.service_key_header", &authz.service_key_header),
	] {
		if let Err(e) = HeaderName::from_bytes(value.as_bytes()) {
			return Err(ConfigError::Validation(format!(
				"{key} '{value}' is not a valid HTTP header name: {e}"
			)));
		}
	}

	if authz
		.channel_key_header
		.eq_ignore_ascii_case(&authz.service_key_header)
	{
		return Err(ConfigError::Validation(format!(
			"channel and service key headers must differ, both are '{}'",
			authz.channel_key_header
		)));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use cleanup_server_authz::CreatorCheck;
	use proptest::prelude::*;
	use std::io::Write;

	struct Fixed(Precedence, ServerConfigLayer);

	impl ConfigSource for Fixed {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn timeout_layer(ms: u64) -> ServerConfigLayer {
		ServerConfigLayer {
			authz: Some(AuthzConfigLayer {
				lookup_timeout_ms: Some(ms),
				..Default::default()
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults_finalize_and_validate() {
		let config = finalize(ServerConfigLayer::default()).unwrap();
		assert_eq!(config, ServerConfig::default());
		assert_eq!(config.lookup_timeout(), Duration::from_secs(5));
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_sources(vec![
			Box::new(Fixed(Precedence::Environment, timeout_layer(100))),
			Box::new(Fixed(Precedence::ConfigFile, timeout_layer(900))),
		])
		.unwrap();
		assert_eq!(config.authz.lookup_timeout_ms, 100);
	}

	#[test]
	fn test_file_overrides_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			"[authz]\nlead_or_admin_creator_check = \"authoritative\"\n"
		)
		.unwrap();
		let config = load_sources(vec![
			Box::new(DefaultsSource),
			Box::new(TomlSource::new(file.path())),
		])
		.unwrap();
		assert_eq!(
			config.authz.lead_or_admin_creator_check,
			CreatorCheck::Authoritative
		);
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let err = finalize(timeout_layer(0)).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_blank_header_rejected() {
		let layer = ServerConfigLayer {
			authz: Some(AuthzConfigLayer {
				service_key_header: Some("  ".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("authz.service_key_header"));
	}

	#[test]
	fn test_identical_headers_rejected() {
		let layer = ServerConfigLayer {
			authz: Some(AuthzConfigLayer {
				channel_key_header: Some("X-Key".to_string()),
				service_key_header: Some("x-key".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(finalize(layer).is_err());
	}

	#[test]
	fn test_invalid_header_name_rejected() {
		for bad in ["IFTTT Channel Key", "X-Key:", "X-Kéy"] {
			let layer = ServerConfigLayer {
				authz: Some(AuthzConfigLayer {
					channel_key_header: Some(bad.to_string()),
					..Default::default()
				}),
				..Default::default()
			};
			let err = finalize(layer).unwrap_err();
			assert!(
				err.to_string().contains("authz.channel_key_header"),
				"{bad}: {err}"
			);
		}
	}

	#[test]
	fn test_mixed_case_header_name_accepted() {
		let layer = ServerConfigLayer {
			authz: Some(AuthzConfigLayer {
				service_key_header: Some("X-Zap-Service".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let config = finalize(layer).unwrap();
		assert_eq!(config.authz.service_key_header, "X-Zap-Service");
	}

	proptest! {
		#[test]
		fn any_positive_timeout_is_accepted(ms in 1u64..=600_000) {
			let config = finalize(timeout_layer(ms)).unwrap();
			prop_assert_eq!(config.lookup_timeout(), Duration::from_millis(ms));
		}
	}
}
