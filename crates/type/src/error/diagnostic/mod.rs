// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod channel;
pub mod internal;
pub mod io;
pub mod lineage;

pub use internal::{internal, internal_with_context};

/// A structured description of a failure: a stable code, a human readable
/// message and optional guidance. Diagnostics nest through `cause`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	/// The task or operator the failure is attributed to
	pub task: Option<String>,
	pub label: Option<String>,
	pub help: Option<String>,
	pub notes: Vec<String>,
	pub cause: Option<Box<Diagnostic>>,
}

impl Diagnostic {
	pub fn with_task(mut self, task: impl Into<String>) -> Self {
		self.task = Some(task.into());
		self
	}

	pub fn with_cause(mut self, cause: Diagnostic) -> Self {
		self.cause = Some(Box::new(cause));
		self
	}

	/// Walks the cause chain down to the innermost diagnostic
	pub fn root_cause(&self) -> &Diagnostic {
		let mut current = self;
		while let Some(cause) = &current.cause {
			current = cause;
		}
		current
	}
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
	fn into_diagnostic(self) -> Diagnostic {
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_root_cause() {
		let inner = channel::reuse_violation("stream#1");
		let outer = io::write_failed("/tmp/out.txt", "disk full").with_cause(inner.clone());
		assert_eq!(outer.root_cause(), &inner);
		assert_eq!(inner.root_cause(), &inner);
	}

	#[test]
	fn test_with_task() {
		let diagnostic = channel::not_produced("stream#2").with_task("Map[op#4]");
		assert_eq!(diagnostic.task.as_deref(), Some("Map[op#4]"));
	}
}
