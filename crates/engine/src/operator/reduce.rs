// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::{IndexMap, map::Entry};
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Value,
	function::{KeyDescriptor, ReduceDescriptor},
};

use crate::{
	context::EvaluationContext,
	operator::{
		COLLECTION, ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, input,
		model_eager_execution, open_function, output,
	},
};

/// Folds the whole input into one element. An empty input yields an empty
/// output.
pub struct GlobalReduceOperator {
	id: OperatorId,
	function: ReduceDescriptor,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl GlobalReduceOperator {
	pub fn new(id: impl Into<OperatorId>, function: ReduceDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", function.input_type())],
			outputs: [OutputSlot::new("output", function.output_type())],
			function,
		}
	}
}

impl ExecutionOperator for GlobalReduceOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"GlobalReduce"
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
		let reduce = open_function(self.name(), &self.function, &self.inputs, inputs, ctx)?;

		let mut acc: Option<Value> = None;
		for item in input(self.name(), inputs, 0)?.provide_stream()? {
			let value = item?;
			acc = Some(match acc {
				Some(acc) => reduce(acc, value)?,
				None => value,
			});
		}

		output(self.name(), outputs, 0)?.accept_collection(acc.into_iter().collect::<Vec<_>>())?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}

/// Folds the elements sharing a key. Groups are emitted in the order their
/// keys first appeared.
pub struct ReduceByOperator {
	id: OperatorId,
	key: KeyDescriptor,
	function: ReduceDescriptor,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl ReduceByOperator {
	pub fn new(id: impl Into<OperatorId>, key: KeyDescriptor, function: ReduceDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", function.input_type())],
			outputs: [OutputSlot::new("output", function.output_type())],
			key,
			function,
		}
	}
}

impl ExecutionOperator for ReduceByOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"ReduceBy"
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
		let key = open_function(self.name(), &self.key, &self.inputs, inputs, ctx)?;
		let reduce = open_function(self.name(), &self.function, &self.inputs, inputs, ctx)?;

		let mut groups: IndexMap<Value, Value> = IndexMap::new();
		for item in input(self.name(), inputs, 0)?.provide_stream()? {
			let value = item?;
			match groups.entry(key(&value)?) {
				Entry::Occupied(mut entry) => {
					let acc = entry.get().clone();
					entry.insert(reduce(acc, value)?);
				}
				Entry::Vacant(entry) => {
					entry.insert(value);
				}
			}
		}

		let reduced: Vec<Value> = groups.into_values().collect();
		output(self.name(), outputs, 0)?.accept_collection(reduced)?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}
