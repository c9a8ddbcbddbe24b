// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
	function::FlatMapDescriptor,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, data_or_broadcast, ensure_arity, input,
		model_lazy_execution, open_function, output,
	},
};

pub struct FlatMapOperator {
	id: OperatorId,
	function: FlatMapDescriptor,
	inputs: Vec<InputSlot>,
	outputs: [OutputSlot; 1],
}

impl FlatMapOperator {
	pub fn new(id: impl Into<OperatorId>, function: FlatMapDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: vec![InputSlot::new("input", function.input_type())],
			outputs: [OutputSlot::new("output", function.output_type())],
			function,
		}
	}

	pub fn with_broadcast(mut self, name: impl Into<String>, element_type: Type) -> Self {
		self.inputs.push(InputSlot::broadcast(name, element_type));
		self
	}
}

impl ExecutionOperator for FlatMapOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"FlatMap"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		data_or_broadcast(&self.inputs, slot, STREAM_OR_COLLECTION)
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
		let function = open_function(self.name(), &self.function, &self.inputs, inputs, ctx)?;

		let stream = input(self.name(), inputs, 0)?.provide_stream()?;
		let flattened = stream.flat_map(move |item| {
			let expanded: Vec<Result<Value>> = match item.and_then(|value| function(value)) {
				Ok(values) => values.into_iter().map(Ok).collect(),
				Err(err) => vec![Err(err)],
			};
			expanded
		});
		output(self.name(), outputs, 0)?.accept_stream(Box::new(flattened))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}
