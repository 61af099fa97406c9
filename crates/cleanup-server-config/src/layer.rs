// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{AuthzConfigLayer, LoggingConfigLayer};

/// One source's view of the configuration. Unset fields leave lower layers
/// in place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub authz: Option<AuthzConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_option(&mut self.authz, other.authz, AuthzConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_keeps_base_when_other_empty() {
		let mut base = ServerConfigLayer {
			authz: Some(AuthzConfigLayer {
				lookup_timeout_ms: Some(900),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer::default());
		assert_eq!(base.authz.unwrap().lookup_timeout_ms, Some(900));
	}

	#[test]
	fn merge_overwrites_field_by_field() {
		let mut base = ServerConfigLayer {
			authz: Some(AuthzConfigLayer {
				lookup_timeout_ms: Some(900),
				subject_fallback: Some(false),
				..Default::default()
			}),
			..Default::default()
		};
		let other = ServerConfigLayer {
			authz: Some(AuthzConfigLayer {
				subject_fallback: Some(true),
				..Default::default()
			}),
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
				..Default::default()
			}),
		};
		base.merge(other);

		let authz = base.authz.unwrap();
		assert_eq!(authz.lookup_timeout_ms, Some(900));
		assert_eq!(authz.subject_fallback, Some(true));
		assert_eq!(base.logging.unwrap().level, Some("debug".to_string()));
	}
}
