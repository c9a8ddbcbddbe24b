// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, ensure_arity, input,
		model_quasi_eager_execution, output,
	},
};

/// Distinct elements of the first input that also occur in the second,
/// in the order of the first input. The second input is drained up front.
pub struct IntersectOperator {
	id: OperatorId,
	inputs: [InputSlot; 2],
	outputs: [OutputSlot; 1],
}

impl IntersectOperator {
	pub fn new(id: impl Into<OperatorId>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("first", element_type), InputSlot::new("second", element_type)],
			outputs: [OutputSlot::new("output", element_type)],
		}
	}
}

impl ExecutionOperator for IntersectOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Intersect"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 | 1 => STREAM_OR_COLLECTION,
			_ => &[],
		}
	}

	fn supported_output_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 => STREAM,
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

		let mut candidates: HashSet<Value> = HashSet::new();
		for item in input(self.name(), inputs, 1)?.provide_stream()? {
			candidates.insert(item?);
		}

		let first = input(self.name(), inputs, 0)?.provide_stream()?;
		let intersection = first.filter(move |item| match item {
			Ok(value) => candidates.remove(value),
			Err(_) => true,
		});
		output(self.name(), outputs, 0)?.accept_stream(Box::new(intersection))?;
		model_quasi_eager_execution(self.name(), inputs, outputs, &[1], ctx)
	}
}
