// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// A stream channel instance was consumed a second time
pub fn reuse_violation(instance: impl Into<String>) -> Diagnostic {
	let instance = instance.into();
	Diagnostic {
		code: "CHANNEL_001".to_string(),
		message: format!("Stream channel instance {} was already consumed", instance),
		task: None,
		label: Some("stream channels can be read exactly once".to_string()),
		help: Some("Materialize the data into a collection channel if it is read by more than one consumer"
			.to_string()),
		notes: vec![],
		cause: None,
	}
}

/// An operator was handed a channel kind it does not declare for the slot
pub fn unsupported_channel(
	operator: impl Into<String>,
	direction: &str,
	slot: usize,
	descriptor: impl Into<String>,
) -> Diagnostic {
	let operator = operator.into();
	let descriptor = descriptor.into();
	Diagnostic {
		code: "CHANNEL_002".to_string(),
		message: format!("{} does not support channel {} on {} slot {}", operator, descriptor, direction, slot),
		task: None,
		label: Some(format!("unsupported channel on {} slot {}", direction, slot)),
		help: Some("Insert a conversion operator between producer and consumer".to_string()),
		notes: vec!["This indicates a planning defect".to_string()],
		cause: None,
	}
}

/// A channel instance was read before its producer accepted any data
pub fn not_produced(instance: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CHANNEL_003".to_string(),
		message: format!("Channel instance {} has not been produced yet", instance.into()),
		task: None,
		label: None,
		help: Some("Execute the producing operator before its consumers".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A channel instance received data twice
pub fn already_accepted(instance: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "CHANNEL_004".to_string(),
		message: format!("Channel instance {} already accepted its data", instance.into()),
		task: None,
		label: None,
		help: None,
		notes: vec!["Each channel instance is filled exactly once by its producer".to_string()],
		cause: None,
	}
}

/// A file channel instance was asked for its single path but holds a different number
pub fn not_single_path(instance: impl Into<String>, count: usize) -> Diagnostic {
	Diagnostic {
		code: "CHANNEL_005".to_string(),
		message: format!("File channel instance {} holds {} paths, expected exactly one", instance.into(), count),
		task: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// A channel instance was asked to accept or provide a representation it does not hold
pub fn representation_mismatch(instance: impl Into<String>, requested: &str) -> Diagnostic {
	let instance = instance.into();
	Diagnostic {
		code: "CHANNEL_002".to_string(),
		message: format!("Channel instance {} cannot handle {} data", instance, requested),
		task: None,
		label: Some(format!("{} requested", requested)),
		help: Some("Insert a conversion operator between producer and consumer".to_string()),
		notes: vec!["This indicates a planning defect".to_string()],
		cause: None,
	}
}
