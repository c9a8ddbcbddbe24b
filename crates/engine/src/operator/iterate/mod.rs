// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Iterative operators are scheduled once per epoch. Their state lives in
//! the executor's [`IterationStates`](crate::state::IterationStates): the
//! state picks the physical input slot to read, and each call populates
//! either the continuing or the final output while the other is set to
//! `None`.

use tributary_core::{ChannelInstance, LineageCollection, Result};

use crate::{
	context::EvaluationContext,
	error::EngineError,
	operator::{forward, input, output},
	state::LoopState,
};

pub mod r#loop;
pub mod repeat;

pub use r#loop::LoopOperator;
pub use repeat::RepeatOperator;

/// The input for the current state, failing with an illegal state
/// transition when the planner did not supply it
pub(crate) fn state_input<'a>(
	operator: &str,
	inputs: &'a mut [Option<ChannelInstance>],
	slot: usize,
	slot_name: &'static str,
	state: LoopState,
) -> Result<&'a mut ChannelInstance> {
	if !matches!(inputs.get(slot), Some(Some(_))) {
		return Err(EngineError::MissingIterationInput {
			operator: operator.to_string(),
			slot: slot_name,
			state,
		}
		.into());
	}
	input(operator, inputs, slot)
}

/// Moves the data of an input slot to an output slot
pub(crate) fn forward_slot(
	operator: &str,
	inputs: &mut [Option<ChannelInstance>],
	from: usize,
	outputs: &mut [Option<ChannelInstance>],
	to: usize,
) -> Result<()> {
	let source = input(operator, inputs, from)?;
	let target = output(operator, outputs, to)?;
	forward(source, target)
}

/// Clears an output slot that is inactive for this call
pub(crate) fn deactivate(outputs: &mut [Option<ChannelInstance>], slot: usize) {
	if let Some(output) = outputs.get_mut(slot) {
		*output = None;
	}
}

/// Records the call as one execution node and forces only what the call
/// drained. Forwarded inputs are chained onto the outputs that received
/// them, so their pending lineage is forced by whoever drains the output.
pub(crate) fn model_iteration_execution(
	operator: &str,
	inputs: &[Option<ChannelInstance>],
	outputs: &[Option<ChannelInstance>],
	forwarded: &[(usize, usize)],
	drained: &[usize],
	ctx: &mut EvaluationContext<'_>,
) -> Result<LineageCollection> {
	let node = ctx.lineage.add_execution(operator);
	ctx.lineage.add_atomic_execution_from(node, ctx.operator_context)?;

	for slot in drained {
		if let Some(Some(instance)) = inputs.get(*slot) {
			ctx.lineage.add_predecessor(node, instance.lineage())?;
		}
	}
	for instance in outputs.iter().flatten() {
		ctx.lineage.add_predecessor(instance.lineage(), node)?;
	}
	for (from, to) in forwarded {
		if let (Some(Some(source)), Some(Some(target))) = (inputs.get(*from), outputs.get(*to)) {
			ctx.lineage.add_predecessor(target.lineage(), source.lineage())?;
		}
	}

	ctx.lineage.collect_and_mark(node)
}
