// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
};

use crate::{
	context::EvaluationContext,
	operator::{
		COLLECTION, ExecutionMode, ExecutionOperator, STREAM, ensure_arity, input, materialize,
		model_eager_execution, model_lazy_execution, output,
	},
};

/// Materializes a stream into a collection
pub struct CollectOperator {
	id: OperatorId,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl CollectOperator {
	pub fn new(id: impl Into<OperatorId>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", element_type)],
			outputs: [OutputSlot::new("output", element_type)],
		}
	}
}

impl ExecutionOperator for CollectOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Collect"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 => STREAM,
			_ => &[],
		}
	}

	fn supported_output_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 => COLLECTION,
			_ => &[],
		}
	}

	fn execution_mode(&self) -> ExecutionMode {
		ExecutionMode::Eager
	}

	fn evaluate(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		ensure_arity(self, inputs, outputs)?;
		let collected = materialize(input(self.name(), inputs, 0)?)?;
		output(self.name(), outputs, 0)?.accept_collection(collected)?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}

/// Exposes a collection as a stream without copying it
pub struct StreamOperator {
	id: OperatorId,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl StreamOperator {
	pub fn new(id: impl Into<OperatorId>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", element_type)],
			outputs: [OutputSlot::new("output", element_type)],
		}
	}
}

impl ExecutionOperator for StreamOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Stream"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 => COLLECTION,
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
		ExecutionMode::Lazy
	}

	fn evaluate(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		ensure_arity(self, inputs, outputs)?;
		let stream = input(self.name(), inputs, 0)?.provide_stream()?;
		output(self.name(), outputs, 0)?.accept_stream(stream)?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}
