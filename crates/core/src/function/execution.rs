// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use tributary_type::{Result, Value};

/// What an open hook can see of the running operator.
pub trait ExecutionContext {
	/// The materialized data of the broadcast input named `name`
	fn broadcast(&self, name: &str) -> Result<Arc<Vec<Value>>>;

	/// The iteration epoch of the current invocation
	fn current_iteration(&self) -> usize;
}
