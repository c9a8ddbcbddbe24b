// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
	function::KeyDescriptor,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, ensure_arity, input,
		model_quasi_eager_execution, output,
	},
};

const LEFT: usize = 0;
const RIGHT: usize = 1;

/// Equi-join on two key functions. The side with the smaller estimated
/// cardinality is hashed, the other side is probed lazily. Matches are
/// emitted as `Tuple([left, right])` in probe order.
pub struct JoinOperator {
	id: OperatorId,
	left_key: KeyDescriptor,
	right_key: KeyDescriptor,
	inputs: [InputSlot; 2],
	outputs: [OutputSlot; 1],
}

impl JoinOperator {
	pub fn new(id: impl Into<OperatorId>, left_key: KeyDescriptor, right_key: KeyDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("left", left_key.input_type()), InputSlot::new("right", right_key.input_type())],
			outputs: [OutputSlot::new("output", Type::Tuple)],
			left_key,
			right_key,
		}
	}

	fn estimated_size(
		&self,
		slot: usize,
		inputs: &[Option<ChannelInstance>],
		ctx: &EvaluationContext<'_>,
	) -> Option<u64> {
		ctx.operator_context
			.input_cardinality(slot)
			.map(|estimate| estimate.average())
			.or_else(|| inputs.get(slot)?.as_ref()?.size().map(|size| size as u64))
	}
}

impl ExecutionOperator for JoinOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Join"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			LEFT | RIGHT => STREAM_OR_COLLECTION,
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
		let left_key = ctx.compiler.compile(&self.left_key);
		let right_key = ctx.compiler.compile(&self.right_key);

		let build_left = match (self.estimated_size(LEFT, inputs, ctx), self.estimated_size(RIGHT, inputs, ctx)) {
			(Some(left), Some(right)) => left < right,
			(Some(_), None) => true,
			_ => false,
		};
		let (build_slot, probe_slot) = if build_left {
			(LEFT, RIGHT)
		} else {
			(RIGHT, LEFT)
		};
		let (build_key, probe_key) = if build_left {
			(left_key, right_key)
		} else {
			(right_key, left_key)
		};
		debug!(build = build_slot, probe = probe_slot, "building join table");

		let mut table: HashMap<Value, Vec<Value>> = HashMap::new();
		for item in input(self.name(), inputs, build_slot)?.provide_stream()? {
			let value = item?;
			table.entry(build_key(&value)?).or_default().push(value);
		}

		let probe = input(self.name(), inputs, probe_slot)?.provide_stream()?;
		let joined = probe.flat_map(move |item| {
			let matches: Vec<Result<Value>> = match item.and_then(|value| Ok((probe_key(&value)?, value))) {
				Ok((key, value)) => table
					.get(&key)
					.map(|partners| {
						partners
							.iter()
							.map(|partner| {
								Ok(if build_left {
									Value::pair(partner.clone(), value.clone())
								} else {
									Value::pair(value.clone(), partner.clone())
								})
							})
							.collect()
					})
					.unwrap_or_default(),
				Err(err) => vec![Err(err)],
			};
			matches
		});

		output(self.name(), outputs, 0)?.accept_stream(Box::new(joined))?;
		model_quasi_eager_execution(self.name(), inputs, outputs, &[build_slot], ctx)
	}
}
