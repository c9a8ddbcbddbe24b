// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
	function::ConvergenceDescriptor,
};

use super::{deactivate, forward_slot, model_iteration_execution, state_input};
use crate::{
	context::EvaluationContext,
	error::EngineError,
	operator::{COLLECTION, ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, open_function},
	state::{IterationState, LoopState},
};

pub const INITIAL_INPUT: usize = 0;
pub const INITIAL_CONVERGENCE_INPUT: usize = 1;
pub const ITERATION_INPUT: usize = 2;
pub const ITERATION_CONVERGENCE_INPUT: usize = 3;

pub const ITERATION_OUTPUT: usize = 0;
pub const FINAL_OUTPUT: usize = 1;
pub const ITERATION_CONVERGENCE_OUTPUT: usize = 2;

/// Iterates until a predicate over the convergence collection holds. The
/// convergence data travels on its own slot pair next to the loop data.
pub struct LoopOperator {
	id: OperatorId,
	criterion: ConvergenceDescriptor,
	expected_iterations: usize,
	inputs: [InputSlot; 4],
	outputs: [OutputSlot; 3],
}

impl LoopOperator {
	pub fn new(
		id: impl Into<OperatorId>,
		criterion: ConvergenceDescriptor,
		element_type: Type,
		expected_iterations: usize,
	) -> Self {
		let convergence_type = criterion.input_type();
		Self {
			id: id.into(),
			criterion,
			expected_iterations,
			inputs: [
				InputSlot::new("initial", element_type),
				InputSlot::new("initial-convergence", convergence_type),
				InputSlot::new("iteration", element_type),
				InputSlot::new("iteration-convergence", convergence_type),
			],
			outputs: [
				OutputSlot::new("iteration", element_type),
				OutputSlot::new("final", element_type),
				OutputSlot::new("iteration-convergence", convergence_type),
			],
		}
	}

	/// Iteration count assumed for cost estimates
	pub fn expected_iterations(&self) -> usize {
		self.expected_iterations
	}
}

impl ExecutionOperator for LoopOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Loop"
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
			INITIAL_CONVERGENCE_INPUT | ITERATION_CONVERGENCE_INPUT => COLLECTION,
			_ => &[],
		}
	}

	fn supported_output_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			ITERATION_OUTPUT | FINAL_OUTPUT => STREAM_OR_COLLECTION,
			ITERATION_CONVERGENCE_OUTPUT => COLLECTION,
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
		let (data, convergence, iteration, converged, drained) = match current.state {
			LoopState::NotStarted => {
				state_input(self.name(), inputs, INITIAL_INPUT, "initial", current.state)?;
				state_input(self.name(), inputs, INITIAL_CONVERGENCE_INPUT, "initial convergence", current.state)?;
				(INITIAL_INPUT, INITIAL_CONVERGENCE_INPUT, 0, false, None)
			}
			LoopState::Running => {
				state_input(self.name(), inputs, ITERATION_INPUT, "iteration", current.state)?;
				let collection =
					state_input(self.name(), inputs, ITERATION_CONVERGENCE_INPUT, "iteration convergence", current.state)?
						.provide_collection()?;
				let criterion = open_function(self.name(), &self.criterion, &self.inputs, inputs, ctx)?;
				let converged = criterion(collection.as_slice())?;
				(
					ITERATION_INPUT,
					ITERATION_CONVERGENCE_INPUT,
					current.iteration + 1,
					converged,
					Some(ITERATION_CONVERGENCE_INPUT),
				)
			}
			LoopState::Finished => {
				return Err(EngineError::IterationFinished {
					operator: self.name().to_string(),
				}
				.into());
			}
		};

		let (next, forwarded) = if converged {
			forward_slot(self.name(), inputs, data, outputs, FINAL_OUTPUT)?;
			deactivate(outputs, ITERATION_OUTPUT);
			deactivate(outputs, ITERATION_CONVERGENCE_OUTPUT);
			(LoopState::Finished, vec![(data, FINAL_OUTPUT)])
		} else {
			forward_slot(self.name(), inputs, data, outputs, ITERATION_OUTPUT)?;
			forward_slot(self.name(), inputs, convergence, outputs, ITERATION_CONVERGENCE_OUTPUT)?;
			deactivate(outputs, FINAL_OUTPUT);
			(LoopState::Running, vec![(data, ITERATION_OUTPUT), (convergence, ITERATION_CONVERGENCE_OUTPUT)])
		};

		debug!(operator = %self.id, from = %current.state, to = %next, iteration, "loop transition");
		ctx.iteration_states.set(
			self.id,
			IterationState {
				state: next,
				iteration,
			},
		);
		model_iteration_execution(self.name(), inputs, outputs, &forwarded, drained.as_slice(), ctx)
	}
}
