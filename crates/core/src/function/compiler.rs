// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use tracing::trace;
use tributary_type::Result;

use crate::function::{ExecutionContext, FunctionDescriptor};

/// Turns function descriptors into invocable callables. Functions are
/// already native closures, so compiling hands out the shared callable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionCompiler;

impl FunctionCompiler {
	pub fn new() -> Self {
		Self
	}

	pub fn compile<F: ?Sized>(&self, descriptor: &FunctionDescriptor<F>) -> Arc<F> {
		Arc::clone(descriptor.function())
	}

	/// Runs the open hook of an extended function; plain functions are left
	/// untouched
	pub fn open<F: ?Sized>(&self, descriptor: &FunctionDescriptor<F>, ctx: &dyn ExecutionContext) -> Result<()> {
		if let Some(hook) = descriptor.open_hook() {
			trace!(iteration = ctx.current_iteration(), "opening function");
			hook(ctx)?;
		}
		Ok(())
	}
}
