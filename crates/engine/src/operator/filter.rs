// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
	function::PredicateDescriptor,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, data_or_broadcast, ensure_arity, input,
		model_lazy_execution, open_function, output,
	},
};

pub struct FilterOperator {
	id: OperatorId,
	predicate: PredicateDescriptor,
	inputs: Vec<InputSlot>,
	outputs: [OutputSlot; 1],
}

impl FilterOperator {
	pub fn new(id: impl Into<OperatorId>, predicate: PredicateDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: vec![InputSlot::new("input", predicate.input_type())],
			outputs: [OutputSlot::new("output", predicate.input_type())],
			predicate,
		}
	}

	pub fn with_broadcast(mut self, name: impl Into<String>, element_type: Type) -> Self {
		self.inputs.push(InputSlot::broadcast(name, element_type));
		self
	}
}

impl ExecutionOperator for FilterOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Filter"
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
		let predicate = open_function(self.name(), &self.predicate, &self.inputs, inputs, ctx)?;

		let stream = input(self.name(), inputs, 0)?.provide_stream()?;
		let filtered = stream.filter_map(move |item| match item {
			Ok(value) => match predicate(&value) {
				Ok(true) => Some(Ok(value)),
				Ok(false) => None,
				Err(err) => Some(Err(err)),
			},
			Err(err) => Some(Err(err)),
		});
		output(self.name(), outputs, 0)?.accept_stream(Box::new(filtered))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use tributary_core::{Value, function::ExecutionContext};

	use super::*;
	use crate::operator::harness::*;

	fn even() -> PredicateDescriptor {
		PredicateDescriptor::from_fn(|v| Ok(v.as_i64().unwrap_or(1) % 2 == 0), Type::Int4)
	}

	#[test]
	fn test_filter_keeps_order() {
		let mut h = Harness::new();
		let input = h.collection(ints(1..=8));
		let mut out = h.run(&FilterOperator::new(1, even()), vec![Some(input)], ChannelDescriptor::STREAM).unwrap();
		assert_eq!(drain(&mut out), ints([2, 4, 6, 8]));
	}

	#[test]
	fn test_filter_by_broadcast_iteration() {
		let mut h = Harness::new();
		h.context = h.context.clone().with_iteration(3);
		let predicate = PredicateDescriptor::from_fn(|v| Ok(v != &Value::int4(3)), Type::Int4)
			.with_open(|ctx: &dyn ExecutionContext| {
				assert_eq!(ctx.current_iteration(), 3);
				assert_eq!(ctx.broadcast("blocked")?.len(), 1);
				Ok(())
			});

		let op = FilterOperator::new(1, predicate).with_broadcast("blocked", Type::Int4);
		let input = h.stream(ints(1..=4));
		let blocked = h.collection(ints([3]));
		let mut out = h.run(&op, vec![Some(input), Some(blocked)], ChannelDescriptor::STREAM).unwrap();
		assert_eq!(drain(&mut out), ints([1, 2, 4]));
	}
}
