// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use cleanup_server::AppState;
use cleanup_server_authz::testing::InMemoryStore;
use cleanup_server_authz::{CreatorCheck, Managers};
use cleanup_server_config::{load_config_with_file, ConfigError};

#[test]
fn state_follows_config_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(
		file,
		r#"
[authz]
lead_or_admin_creator_check = "authoritative"
lookup_timeout_ms = 750
channel_key_header = "X-Channel-Key"
"#
	)
	.unwrap();

	let config = load_config_with_file(file.path()).unwrap();
	let state = AppState::from_config(&config, Managers::from_shared(Arc::new(InMemoryStore::new())));

	assert_eq!(state.lookup_timeout, Duration::from_millis(750));
	let options = state.policy.options();
	assert_eq!(options.lead_or_admin_creator_check, CreatorCheck::Authoritative);
	assert_eq!(options.channel_key.channel_key_header, "X-Channel-Key");
	assert_eq!(options.channel_key.service_key_header, "IFTTT-Service-Key");
	assert!(!options.subject_fallback);
}

#[test]
fn header_name_with_spaces_fails_to_load() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "[authz]\nchannel_key_header = \"IFTTT Channel Key\"").unwrap();

	let err = load_config_with_file(file.path()).unwrap_err();
	assert!(matches!(err, ConfigError::Validation(_)), "{err}");
}
