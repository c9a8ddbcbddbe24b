// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing_subscriber::{EnvFilter, fmt};

/// Installs a test-friendly fmt subscriber filtered by `RUST_LOG`. Safe to
/// call from every test; only the first call installs the subscriber.
pub fn init() {
	let _ = fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_test_writer()
		.try_init();
}
