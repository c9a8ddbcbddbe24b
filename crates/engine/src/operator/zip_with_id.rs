// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, ensure_arity, input, model_lazy_execution,
		output,
	},
};

/// Pairs every element with its position, as `Tuple([Int8 id, element])`
pub struct ZipWithIdOperator {
	id: OperatorId,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl ZipWithIdOperator {
	pub fn new(id: impl Into<OperatorId>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", element_type)],
			outputs: [OutputSlot::new("output", Type::Tuple)],
		}
	}
}

impl ExecutionOperator for ZipWithIdOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"ZipWithId"
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
		let zipped = stream
			.enumerate()
			.map(|(id, item)| item.map(|value| Value::pair(Value::Int8(id as i64), value)));
		output(self.name(), outputs, 0)?.accept_stream(Box::new(zipped))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operator::harness::*;

	#[test]
	fn test_ids_start_at_zero() {
		let mut h = Harness::new();
		let input = h.collection(vec![Value::utf8("a"), Value::utf8("b")]);
		let mut out =
			h.run(&ZipWithIdOperator::new(1, Type::Utf8), vec![Some(input)], ChannelDescriptor::STREAM).unwrap();
		assert_eq!(
			drain(&mut out),
			vec![
				Value::pair(Value::int8(0i64), Value::utf8("a")),
				Value::pair(Value::int8(1i64), Value::utf8("b")),
			]
		);
	}
}
