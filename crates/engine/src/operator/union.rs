// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

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

/// Concatenates both inputs, keeping duplicates
pub struct UnionAllOperator {
	id: OperatorId,
	inputs: [InputSlot; 2],
	outputs: [OutputSlot; 1],
}

impl UnionAllOperator {
	pub fn new(id: impl Into<OperatorId>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("first", element_type), InputSlot::new("second", element_type)],
			outputs: [OutputSlot::new("output", element_type)],
		}
	}
}

impl ExecutionOperator for UnionAllOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"UnionAll"
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
		ExecutionMode::Lazy
	}

	fn evaluate(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		ensure_arity(self, inputs, outputs)?;

		let first = input(self.name(), inputs, 0)?.provide_stream()?;
		let second = input(self.name(), inputs, 1)?.provide_stream()?;
		output(self.name(), outputs, 0)?.accept_stream(Box::new(first.chain(second)))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operator::harness::*;

	#[test]
	fn test_union_keeps_duplicates() {
		let mut h = Harness::new();
		let first = h.stream(ints([1, 2]));
		let second = h.collection(ints([2, 3]));
		let op = UnionAllOperator::new(1, Type::Int4);
		let mut out = h.run(&op, vec![Some(first), Some(second)], ChannelDescriptor::STREAM).unwrap();
		assert_eq!(drain(&mut out), ints([1, 2, 2, 3]));
	}
}
