// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
	function::TransformationDescriptor,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, data_or_broadcast, ensure_arity, input,
		model_lazy_execution, open_function, output,
	},
};

pub struct MapOperator {
	id: OperatorId,
	function: TransformationDescriptor,
	inputs: Vec<InputSlot>,
	outputs: [OutputSlot; 1],
}

impl MapOperator {
	pub fn new(id: impl Into<OperatorId>, function: TransformationDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: vec![InputSlot::new("input", function.input_type())],
			outputs: [OutputSlot::new("output", function.output_type())],
			function,
		}
	}

	/// Declares a broadcast input, available to the function's open hook
	/// under `name`
	pub fn with_broadcast(mut self, name: impl Into<String>, element_type: Type) -> Self {
		self.inputs.push(InputSlot::broadcast(name, element_type));
		self
	}
}

impl ExecutionOperator for MapOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Map"
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
		let mapped = stream.map(move |item| item.and_then(|value| function(value)));
		output(self.name(), outputs, 0)?.accept_stream(Box::new(mapped))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicI32, Ordering},
	};

	use tributary_core::{Value, function::ExecutionContext};

	use super::*;
	use crate::operator::harness::*;

	fn double() -> TransformationDescriptor {
		TransformationDescriptor::from_fn(|v| Ok(Value::int4(v.as_i64().unwrap_or(0) as i32 * 2)), Type::Int4, Type::Int4)
	}

	#[test]
	fn test_map_stream() {
		let mut h = Harness::new();
		let input = h.stream(ints(1..=3));
		let mut out = h.run(&MapOperator::new(1, double()), vec![Some(input)], ChannelDescriptor::STREAM).unwrap();
		assert_eq!(drain(&mut out), ints([2, 4, 6]));
	}

	#[test]
	fn test_map_is_lazy() {
		let mut h = Harness::new();
		let calls = Arc::new(AtomicI32::new(0));
		let counter = Arc::clone(&calls);
		let function = TransformationDescriptor::from_fn(
			move |v| {
				counter.fetch_add(1, Ordering::SeqCst);
				Ok(v)
			},
			Type::Int4,
			Type::Int4,
		);

		let input = h.collection(ints(1..=3));
		let mut outputs = vec![h.output(ChannelDescriptor::STREAM)];
		let collected = h.evaluate(&MapOperator::new(1, function), &mut [Some(input)], &mut outputs).unwrap();
		assert!(collected.is_empty());
		assert_eq!(calls.load(Ordering::SeqCst), 0);

		drain(outputs[0].as_mut().unwrap());
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[test]
	fn test_map_with_broadcast() {
		let mut h = Harness::new();
		let offset = Arc::new(AtomicI32::new(0));
		let opened = Arc::clone(&offset);
		let applied = Arc::clone(&offset);
		let function = TransformationDescriptor::from_fn(
			move |v| Ok(Value::int4(v.as_i64().unwrap_or(0) as i32 + applied.load(Ordering::SeqCst))),
			Type::Int4,
			Type::Int4,
		)
		.with_open(move |ctx: &dyn ExecutionContext| {
			let offsets = ctx.broadcast("offset")?;
			opened.store(offsets[0].as_i64().unwrap_or(0) as i32, Ordering::SeqCst);
			Ok(())
		});

		let op = MapOperator::new(1, function).with_broadcast("offset", Type::Int4);
		assert_eq!(op.supported_input_channels(1), &[ChannelDescriptor::COLLECTION]);

		let input = h.stream(ints(1..=3));
		let broadcast = h.collection(ints([10]));
		let mut out = h.run(&op, vec![Some(input), Some(broadcast)], ChannelDescriptor::STREAM).unwrap();
		assert_eq!(drain(&mut out), ints([11, 12, 13]));
	}

	#[test]
	fn test_missing_broadcast_fails() {
		let mut h = Harness::new();
		let function = double().with_open(|ctx: &dyn ExecutionContext| ctx.broadcast("absent").map(|_| ()));

		let input = h.stream(ints(1..=3));
		let err = h.run(&MapOperator::new(1, function), vec![Some(input)], ChannelDescriptor::STREAM).unwrap_err();
		assert_eq!(err.code, "BROADCAST_001");
	}

	#[test]
	fn test_function_error_surfaces_in_stream() {
		let mut h = Harness::new();
		let function = TransformationDescriptor::from_fn(
			|_| Err(tributary_core::Error(tributary_core::diagnostic::internal::internal("boom"))),
			Type::Int4,
			Type::Int4,
		);

		let input = h.stream(ints(1..=2));
		let mut out = h.run(&MapOperator::new(1, function), vec![Some(input)], ChannelDescriptor::STREAM).unwrap();
		let first = out.provide_stream().unwrap().next().unwrap();
		assert_eq!(first.unwrap_err().code, "INTERNAL_ERROR");
	}
}
