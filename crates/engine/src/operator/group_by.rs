// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexMap;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
	function::KeyDescriptor,
};

use crate::{
	context::EvaluationContext,
	operator::{
		COLLECTION, ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, input,
		model_eager_execution, open_function, output,
	},
};

/// Groups the input by key into `Tuple([key, Tuple(group)])` elements,
/// ordered by first key occurrence
pub struct MaterializedGroupByOperator {
	id: OperatorId,
	key: KeyDescriptor,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl MaterializedGroupByOperator {
	pub fn new(id: impl Into<OperatorId>, key: KeyDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", key.input_type())],
			outputs: [OutputSlot::new("groups", Type::Tuple)],
			key,
		}
	}
}

impl ExecutionOperator for MaterializedGroupByOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"MaterializedGroupBy"
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

		let mut groups: IndexMap<Value, Vec<Value>> = IndexMap::new();
		for item in input(self.name(), inputs, 0)?.provide_stream()? {
			let value = item?;
			groups.entry(key(&value)?).or_default().push(value);
		}

		let grouped: Vec<Value> =
			groups.into_iter().map(|(key, group)| Value::pair(key, Value::Tuple(group))).collect();
		output(self.name(), outputs, 0)?.accept_collection(grouped)?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operator::harness::*;

	#[test]
	fn test_groups_by_first_letter() {
		let mut h = Harness::new();
		let initial = KeyDescriptor::from_fn(
			|v| Ok(Value::utf8(v.as_str().unwrap_or_default().chars().take(1).collect::<String>())),
			Type::Utf8,
			Type::Utf8,
		);

		let words = ["apple", "bean", "avocado"].into_iter().map(Value::utf8).collect();
		let input = h.collection(words);
		let out = h
			.run(&MaterializedGroupByOperator::new(1, initial), vec![Some(input)], ChannelDescriptor::COLLECTION)
			.unwrap();
		assert_eq!(
			out.provide_collection().unwrap().as_slice(),
			&[
				Value::pair(Value::utf8("a"), Value::tuple([Value::utf8("apple"), Value::utf8("avocado")])),
				Value::pair(Value::utf8("b"), Value::tuple([Value::utf8("bean")])),
			]
		);
	}
}
