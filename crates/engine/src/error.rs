// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::ChannelDescriptor;
use tributary_type::{
	Diagnostic, Error, IntoDiagnostic,
	error::diagnostic::channel::unsupported_channel,
};

use crate::state::LoopState;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("Executing {task} failed")]
	OperatorExecutionFailure {
		task: String,
		cause: Box<Error>,
	},

	#[error("{operator} expected {expected}, found {found}")]
	MalformedElement {
		operator: String,
		expected: &'static str,
		found: String,
	},

	#[error("No such broadcast found: {name}")]
	BroadcastNotFound {
		operator: String,
		name: String,
	},

	#[error("{operator} was executed after it finished")]
	IterationFinished {
		operator: String,
	},

	#[error("{operator} has no {slot} input while {state}")]
	MissingIterationInput {
		operator: String,
		slot: &'static str,
		state: LoopState,
	},

	#[error("{operator} expects {expected} {direction} channels, got {actual}")]
	ArityMismatch {
		operator: String,
		direction: &'static str,
		expected: usize,
		actual: usize,
	},

	#[error("{operator} is missing its {direction} channel on slot {slot}")]
	MissingChannel {
		operator: String,
		direction: &'static str,
		slot: usize,
	},

	#[error("{operator} does not support {descriptor} on {direction} slot {slot}")]
	UnsupportedChannel {
		operator: String,
		direction: &'static str,
		slot: usize,
		descriptor: ChannelDescriptor,
	},

	#[error("{operator} did not drain its stream input on slot {slot}")]
	UndrainedInput {
		operator: String,
		slot: usize,
	},

	#[error("{operator} cannot determine the size of its input")]
	UnknownDatasetSize {
		operator: String,
	},
}

impl IntoDiagnostic for EngineError {
	fn into_diagnostic(self) -> Diagnostic {
		let message = self.to_string();
		match self {
			EngineError::OperatorExecutionFailure {
				task,
				cause,
			} => Diagnostic {
				code: "EXECUTION_001".to_string(),
				message,
				task: Some(task),
				label: Some("operator evaluation failed".to_string()),
				help: None,
				notes: vec!["The enclosing job is expected to fail; no retry happens at this layer".to_string()],
				cause: Some(Box::new((*cause).diagnostic())),
			},

			EngineError::MalformedElement {
				operator,
				expected,
				..
			} => Diagnostic {
				code: "EXECUTION_002".to_string(),
				message,
				task: Some(operator),
				label: Some(format!("element is not {}", expected)),
				help: None,
				notes: vec![],
				cause: None,
			},

			EngineError::BroadcastNotFound {
				operator,
				name,
			} => Diagnostic {
				code: "BROADCAST_001".to_string(),
				message,
				task: Some(operator),
				label: Some(format!("broadcast '{}' is not declared", name)),
				help: Some("Declare a broadcast input slot with this name on the operator".to_string()),
				notes: vec![],
				cause: None,
			},

			EngineError::IterationFinished {
				operator,
			} => Diagnostic {
				code: "ITERATION_001".to_string(),
				message,
				task: Some(operator),
				label: Some("illegal state transition".to_string()),
				help: None,
				notes: vec!["Iterative operators must not be scheduled after they finished".to_string()],
				cause: None,
			},

			EngineError::MissingIterationInput {
				operator,
				slot,
				..
			} => Diagnostic {
				code: "ITERATION_002".to_string(),
				message,
				task: Some(operator),
				label: Some(format!("missing {} input", slot)),
				help: None,
				notes: vec![],
				cause: None,
			},

			EngineError::ArityMismatch {
				operator,
				..
			} => Diagnostic {
				code: "PLAN_001".to_string(),
				message,
				task: Some(operator),
				label: Some("arity mismatch".to_string()),
				help: None,
				notes: vec!["This indicates a planning defect".to_string()],
				cause: None,
			},

			EngineError::MissingChannel {
				operator,
				..
			} => Diagnostic {
				code: "PLAN_002".to_string(),
				message,
				task: Some(operator),
				label: None,
				help: None,
				notes: vec!["This indicates a planning defect".to_string()],
				cause: None,
			},

			EngineError::UnsupportedChannel {
				operator,
				direction,
				slot,
				descriptor,
			} => unsupported_channel(operator.clone(), direction, slot, descriptor.to_string()).with_task(operator),

			EngineError::UndrainedInput {
				operator,
				..
			} => Diagnostic {
				code: "PLAN_003".to_string(),
				message,
				task: Some(operator),
				label: Some("eager operators must drain their stream inputs".to_string()),
				help: None,
				notes: vec![],
				cause: None,
			},

			EngineError::UnknownDatasetSize {
				operator,
			} => Diagnostic {
				code: "PLAN_004".to_string(),
				message,
				task: Some(operator),
				label: None,
				help: Some("Provide the dataset size or feed the operator a collection channel".to_string()),
				notes: vec![],
				cause: None,
			},
		}
	}
}

impl From<EngineError> for Error {
	fn from(err: EngineError) -> Self {
		Error(err.into_diagnostic())
	}
}

#[cfg(test)]
mod tests {
	use tributary_type::error::diagnostic::channel::reuse_violation;

	use super::*;

	#[test]
	fn test_execution_failure_keeps_cause() {
		let err: Error = EngineError::OperatorExecutionFailure {
			task: "Count[op#2]".to_string(),
			cause: Box::new(Error(reuse_violation("Stream#4"))),
		}
		.into();

		assert_eq!(err.code, "EXECUTION_001");
		assert_eq!(err.task.as_deref(), Some("Count[op#2]"));
		assert_eq!(err.root_cause().code, "CHANNEL_001");
		assert!(err.to_string().contains("caused by [CHANNEL_001]"));
	}

	#[test]
	fn test_broadcast_not_found() {
		let err: Error = EngineError::BroadcastNotFound {
			operator: "Map[op#1]".to_string(),
			name: "weights".to_string(),
		}
		.into();
		assert_eq!(err.code, "BROADCAST_001");
		assert_eq!(err.message, "No such broadcast found: weights");
	}

	#[test]
	fn test_unsupported_channel() {
		let err: Error = EngineError::UnsupportedChannel {
			operator: "Collect".to_string(),
			direction: "input",
			slot: 0,
			descriptor: ChannelDescriptor::COLLECTION,
		}
		.into();
		assert_eq!(err.code, "CHANNEL_002");
		assert!(err.message.contains("Collection"));
	}
}
