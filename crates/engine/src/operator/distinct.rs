// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashSet;

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, ensure_arity, input, model_lazy_execution,
		output,
	},
};

/// Drops repeated elements, keeping the first occurrence of each
pub struct DistinctOperator {
	id: OperatorId,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl DistinctOperator {
	pub fn new(id: impl Into<OperatorId>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", element_type)],
			outputs: [OutputSlot::new("output", element_type)],
		}
	}
}

impl ExecutionOperator for DistinctOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Distinct"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 => STREAM_OR_COLLECTION,
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
		let mut seen = HashSet::new();
		let distinct = stream.filter(move |item| match item {
			Ok(value) => seen.insert(value.clone()),
			Err(_) => true,
		});
		output(self.name(), outputs, 0)?.accept_stream(Box::new(distinct))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}
