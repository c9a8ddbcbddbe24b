// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
};

use super::{deactivate, forward_slot, model_iteration_execution, state_input};
use crate::{
	context::EvaluationContext,
	error::EngineError,
	operator::{ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity},
	state::{IterationState, LoopState},
};

pub const INITIAL_INPUT: usize = 0;
pub const ITERATION_INPUT: usize = 1;

pub const ITERATION_OUTPUT: usize = 0;
pub const FINAL_OUTPUT: usize = 1;

/// Runs its loop body a fixed number of times
pub struct RepeatOperator {
	id: OperatorId,
	num_iterations: usize,
	inputs: [InputSlot; 2],
	outputs: [OutputSlot; 2],
}

impl RepeatOperator {
	pub fn new(id: impl Into<OperatorId>, num_iterations: usize, element_type: Type) -> Self {
		Self {
			id: id.into(),
			num_iterations,
			inputs: [InputSlot::new("initial", element_type), InputSlot::new("iteration", element_type)],
			outputs: [OutputSlot::new("iteration", element_type), OutputSlot::new("final", element_type)],
		}
	}

	pub fn num_iterations(&self) -> usize {
		self.num_iterations
	}
}

impl ExecutionOperator for RepeatOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Repeat"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			INITIAL_INPUT | ITERATION_INPUT => STREAM_OR_COLLECTION,
			_ => &[],
		}
	}

	fn supported_output_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			ITERATION_OUTPUT | FINAL_OUTPUT => STREAM_OR_COLLECTION,
			_ => &[],
		}
	}

	fn execution_mode(&self) -> ExecutionMode {
		ExecutionMode::QuasiEager
	}

	fn evaluate(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		ensure_arity(self, inputs, outputs)?;

		let current = ctx.iteration_states.get(self.id);
		let (slot, counter) = match current.state {
			LoopState::NotStarted => {
				state_input(self.name(), inputs, INITIAL_INPUT, "initial", current.state)?;
				(INITIAL_INPUT, 0)
			}
			LoopState::Running => {
				state_input(self.name(), inputs, ITERATION_INPUT, "iteration", current.state)?;
				(ITERATION_INPUT, current.iteration + 1)
			}
			LoopState::Finished => {
				return Err(EngineError::IterationFinished {
					operator: self.name().to_string(),
				}
				.into());
			}
		};

		let (next, target) = if counter >= self.num_iterations {
			forward_slot(self.name(), inputs, slot, outputs, FINAL_OUTPUT)?;
			deactivate(outputs, ITERATION_OUTPUT);
			(LoopState::Finished, FINAL_OUTPUT)
		} else {
			forward_slot(self.name(), inputs, slot, outputs, ITERATION_OUTPUT)?;
			deactivate(outputs, FINAL_OUTPUT);
			(LoopState::Running, ITERATION_OUTPUT)
		};

		debug!(operator = %self.id, from = %current.state, to = %next, iteration = counter, "repeat transition");
		ctx.iteration_states.set(
			self.id,
			IterationState {
				state: next,
				iteration: counter,
			},
		);
		model_iteration_execution(self.name(), inputs, outputs, &[(slot, target)], &[], ctx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operator::harness::*;

	fn outputs(h: &mut Harness) -> Vec<Option<ChannelInstance>> {
		vec![h.output(ChannelDescriptor::STREAM), h.output(ChannelDescriptor::STREAM)]
	}

	#[test]
	fn test_repeats_n_times() {
		let mut h = Harness::new();
		let op = RepeatOperator::new(7, 3, Type::Int4);

		let initial = h.stream(ints(1..=3));
		let mut out = outputs(&mut h);
		h.evaluate(&op, &mut [Some(initial), None], &mut out).unwrap();
		assert!(out[FINAL_OUTPUT].is_none());
		let mut carried = out.remove(ITERATION_OUTPUT).unwrap();

		let mut running_calls = 0;
		loop {
			let mut out = outputs(&mut h);
			let collected = h.evaluate(&op, &mut [None, Some(carried)], &mut out).unwrap();
			assert_eq!(collected.executions().len(), 1);
			running_calls += 1;

			if let Some(mut last) = out[FINAL_OUTPUT].take() {
				assert!(out[ITERATION_OUTPUT].is_none());
				assert_eq!(drain(&mut last), ints(1..=3));
				break;
			}
			carried = out.remove(ITERATION_OUTPUT).unwrap();
		}

		assert_eq!(running_calls, 3);
		assert_eq!(h.states.get(op.id()).state, LoopState::Finished);
	}

	#[test]
	fn test_zero_iterations_finishes_immediately() {
		let mut h = Harness::new();
		let op = RepeatOperator::new(1, 0, Type::Int4);
		let initial = h.collection(ints(1..=2));
		let mut out = outputs(&mut h);
		h.evaluate(&op, &mut [Some(initial), None], &mut out).unwrap();
		assert!(out[ITERATION_OUTPUT].is_none());
		assert!(out[FINAL_OUTPUT].is_some());
	}

	#[test]
	fn test_finished_rejects_further_calls() {
		let mut h = Harness::new();
		let op = RepeatOperator::new(1, 0, Type::Int4);
		let initial = h.stream(ints(1..=2));
		let mut out = outputs(&mut h);
		h.evaluate(&op, &mut [Some(initial), None], &mut out).unwrap();

		let again = h.stream(ints(1..=2));
		let mut out = outputs(&mut h);
		let err = h.evaluate(&op, &mut [None, Some(again)], &mut out).unwrap_err();
		assert_eq!(err.code, "ITERATION_001");
	}

	#[test]
	fn test_missing_initial_input() {
		let mut h = Harness::new();
		let op = RepeatOperator::new(1, 2, Type::Int4);
		let iteration = h.stream(ints(1..=2));
		let mut out = outputs(&mut h);
		let err = h.evaluate(&op, &mut [None, Some(iteration)], &mut out).unwrap_err();
		assert_eq!(err.code, "ITERATION_002");
	}
}
