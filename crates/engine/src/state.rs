// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fmt::{Display, Formatter},
};

use tributary_core::OperatorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
	#[default]
	NotStarted,
	Running,
	Finished,
}

impl Display for LoopState {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			LoopState::NotStarted => f.write_str("not started"),
			LoopState::Running => f.write_str("running"),
			LoopState::Finished => f.write_str("finished"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IterationState {
	pub state: LoopState,
	pub iteration: usize,
}

/// Per-operator iteration state, owned by the executor of one job
#[derive(Debug, Default)]
pub struct IterationStates {
	states: HashMap<OperatorId, IterationState>,
}

impl IterationStates {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, operator: OperatorId) -> IterationState {
		self.states.get(&operator).copied().unwrap_or_default()
	}

	pub fn set(&mut self, operator: OperatorId, state: IterationState) {
		self.states.insert(operator, state);
	}

	pub fn reset(&mut self, operator: OperatorId) {
		self.states.remove(&operator);
	}

	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unknown_operator_not_started() {
		let states = IterationStates::new();
		assert_eq!(states.get(OperatorId(1)), IterationState::default());
		assert_eq!(states.get(OperatorId(1)).state, LoopState::NotStarted);
	}

	#[test]
	fn test_set_and_reset() {
		let mut states = IterationStates::new();
		states.set(OperatorId(7), IterationState {
			state: LoopState::Running,
			iteration: 3,
		});
		assert_eq!(states.get(OperatorId(7)).iteration, 3);

		states.reset(OperatorId(7));
		assert!(states.is_empty());
	}
}
