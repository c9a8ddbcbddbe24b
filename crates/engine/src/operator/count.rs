// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use crate::{
	context::EvaluationContext,
	operator::{
		COLLECTION, ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, input,
		model_eager_execution, output,
	},
};

/// Counts its input into a single `Int8` element
pub struct CountOperator {
	id: OperatorId,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl CountOperator {
	pub fn new(id: impl Into<OperatorId>) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", Type::Any)],
			outputs: [OutputSlot::new("count", Type::Int8)],
		}
	}
}

impl ExecutionOperator for CountOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Count"
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

		let instance = input(self.name(), inputs, 0)?;
		let count = match instance.size() {
			Some(size) => size,
			None => {
				let mut count = 0;
				for item in instance.provide_stream()? {
					item?;
					count += 1;
				}
				count
			}
		};

		output(self.name(), outputs, 0)?.accept_collection(vec![Value::Int8(count as i64)])?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operator::harness::*;

	#[test]
	fn test_count_stream() {
		let mut h = Harness::new();
		let input = h.stream(ints(1..=7));
		let out = h.run(&CountOperator::new(1), vec![Some(input)], ChannelDescriptor::COLLECTION).unwrap();
		assert_eq!(out.provide_collection().unwrap().as_slice(), &[Value::int8(7i64)]);
	}

	#[test]
	fn test_count_empty_collection() {
		let mut h = Harness::new();
		let input = h.collection(vec![]);
		let out = h.run(&CountOperator::new(1), vec![Some(input)], ChannelDescriptor::COLLECTION).unwrap();
		assert_eq!(out.provide_collection().unwrap().as_slice(), &[Value::int8(0i64)]);
	}
}
