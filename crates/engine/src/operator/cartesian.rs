// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, ensure_arity, input, materialize,
		model_quasi_eager_execution, output,
	},
};

/// Every pair `Tuple([left, right])`. The right input is materialized, the
/// left one is streamed.
pub struct CartesianOperator {
	id: OperatorId,
	inputs: [InputSlot; 2],
	outputs: [OutputSlot; 1],
}

impl CartesianOperator {
	pub fn new(id: impl Into<OperatorId>, left_type: Type, right_type: Type) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("left", left_type), InputSlot::new("right", right_type)],
			outputs: [OutputSlot::new("output", Type::Tuple)],
		}
	}
}

impl ExecutionOperator for CartesianOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Cartesian"
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

		let right = materialize(input(self.name(), inputs, 1)?)?;
		let left = input(self.name(), inputs, 0)?.provide_stream()?;
		let product = left.flat_map(move |item| {
			let pairs: Vec<Result<Value>> = match item {
				Ok(l) => right.iter().map(|r| Ok(Value::pair(l.clone(), r.clone()))).collect(),
				Err(err) => vec![Err(err)],
			};
			pairs
		});
		output(self.name(), outputs, 0)?.accept_stream(Box::new(product))?;
		model_quasi_eager_execution(self.name(), inputs, outputs, &[1], ctx)
	}
}
