// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use tracing::debug;
use tributary_core::{
	ChannelInstance, InputSlot, LineageGraph, OperatorContext, Result, Value,
	function::{ExecutionContext, FunctionCompiler},
};

use crate::{config::ExecutorConfig, error::EngineError, state::IterationStates};

/// Everything an operator may touch while evaluating
pub struct EvaluationContext<'a> {
	pub lineage: &'a mut LineageGraph,
	pub compiler: &'a FunctionCompiler,
	pub iteration_states: &'a mut IterationStates,
	pub operator_context: &'a OperatorContext,
	pub config: &'a ExecutorConfig,
}

/// Execution context handed to open hooks. Broadcasts are resolved by a
/// linear scan over the operator's declared input slots.
pub struct LocalExecutionContext<'a> {
	operator: &'a str,
	slots: &'a [InputSlot],
	inputs: &'a [Option<ChannelInstance>],
	iteration: usize,
}

impl<'a> LocalExecutionContext<'a> {
	pub fn new(
		operator: &'a str,
		slots: &'a [InputSlot],
		inputs: &'a [Option<ChannelInstance>],
		iteration: usize,
	) -> Self {
		Self {
			operator,
			slots,
			inputs,
			iteration,
		}
	}
}

impl ExecutionContext for LocalExecutionContext<'_> {
	fn broadcast(&self, name: &str) -> Result<Arc<Vec<Value>>> {
		for (slot, input) in self.slots.iter().zip(self.inputs.iter()) {
			if slot.broadcast
				&& slot.name == name
				&& let Some(instance) = input
			{
				debug!(operator = self.operator, broadcast = name, "resolved broadcast");
				return instance.provide_collection();
			}
		}

		Err(EngineError::BroadcastNotFound {
			operator: self.operator.to_string(),
			name: name.to_string(),
		}
		.into())
	}

	fn current_iteration(&self) -> usize {
		self.iteration
	}
}

#[cfg(test)]
mod tests {
	use tributary_core::{Channel, Type};

	use super::*;

	#[test]
	fn test_broadcast_resolved_by_name() {
		let mut lineage = LineageGraph::new();
		let main = Channel::stream(Type::Int4).create_instance(&mut lineage);
		let mut weights = Channel::collection(Type::Int4).create_instance(&mut lineage);
		weights.accept_collection(vec![Value::int4(3)]).unwrap();

		let slots = vec![InputSlot::new("input", Type::Int4), InputSlot::broadcast("weights", Type::Int4)];
		let inputs = vec![Some(main), Some(weights)];
		let ctx = LocalExecutionContext::new("Map", &slots, &inputs, 2);

		assert_eq!(ctx.broadcast("weights").unwrap().as_slice(), &[Value::int4(3)]);
		assert_eq!(ctx.current_iteration(), 2);
	}

	#[test]
	fn test_broadcast_not_found() {
		let slots = vec![InputSlot::new("input", Type::Int4)];
		let inputs = vec![None];
		let ctx = LocalExecutionContext::new("Map", &slots, &inputs, 0);

		let err = ctx.broadcast("input").unwrap_err();
		assert_eq!(err.code, "BROADCAST_001");
		assert_eq!(ctx.broadcast("missing").unwrap_err().code, "BROADCAST_001");
	}
}
