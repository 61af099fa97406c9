// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;
use std::str::FromStr;

use cleanup_server_authz::CreatorCheck;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{AuthzConfigLayer, LogFormat, LoggingConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/cleanup/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: CLEANUP_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from(&Env(|name: &str| std::env::var(name).ok()))
	}
}

/// Variable lookup, swapped out in tests so they never touch the process
/// environment.
struct Env<F>(F);

impl<F> Env<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn var(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self
			.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn u64(&self, name: &str) -> Result<Option<u64>, ConfigError> {
		self.parsed(name)
	}

	fn parsed<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|e| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid value '{v}': {e}"),
			}),
			None => Ok(None),
		}
	}
}

fn load_from<F>(env: &Env<F>) -> Result<ServerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	Ok(ServerConfigLayer {
		authz: Some(load_authz_from_env(env)?),
		logging: Some(load_logging_from_env(env)?),
	})
}

fn load_authz_from_env<F>(env: &Env<F>) -> Result<AuthzConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	Ok(AuthzConfigLayer {
		subject_fallback: env.bool("CLEANUP_SERVER_AUTHZ_SUBJECT_FALLBACK"),
		lead_or_admin_creator_check: env
			.parsed::<CreatorCheck>("CLEANUP_SERVER_AUTHZ_CREATOR_CHECK")?,
		lookup_timeout_ms: env.u64("CLEANUP_SERVER_AUTHZ_LOOKUP_TIMEOUT_MS")?,
		channel_key_header: env.var("CLEANUP_SERVER_AUTHZ_CHANNEL_KEY_HEADER"),
		service_key_header: env.var("CLEANUP_SERVER_AUTHZ_SERVICE_KEY_HEADER"),
		channel_key_secret: env.var("CLEANUP_SERVER_AUTHZ_CHANNEL_KEY_SECRET"),
		service_key_secret: env.var("CLEANUP_SERVER_AUTHZ_SERVICE_KEY_SECRET"),
	})
}

fn load_logging_from_env<F>(env: &Env<F>) -> Result<LoggingConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	Ok(LoggingConfigLayer {
		level: env.var("CLEANUP_SERVER_LOG_LEVEL"),
		format: env.parsed::<LogFormat>("CLEANUP_SERVER_LOG_FORMAT")?,
	})
}
