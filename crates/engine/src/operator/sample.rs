// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};
use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use crate::{
	context::EvaluationContext,
	error::EngineError,
	operator::{
		COLLECTION, ExecutionMode, ExecutionOperator, STREAM, STREAM_OR_COLLECTION, ensure_arity, forward, input,
		model_eager_execution, model_lazy_execution, output,
	},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMethod {
	/// Picks positions up front; needs the dataset size, either declared
	/// or taken from a collection input
	Random,
	/// Single pass over an input of unknown size
	Reservoir,
}

/// Draws `sample_size` elements without replacement. The sample keeps the
/// input order; a sample at least as large as the input is the input.
pub struct SampleOperator {
	id: OperatorId,
	method: SampleMethod,
	sample_size: usize,
	dataset_size: Option<usize>,
	seed: Option<u64>,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl SampleOperator {
	pub fn new(id: impl Into<OperatorId>, method: SampleMethod, sample_size: usize, element_type: Type) -> Self {
		Self {
			id: id.into(),
			method,
			sample_size,
			dataset_size: None,
			seed: None,
			inputs: [InputSlot::new("input", element_type)],
			outputs: [OutputSlot::new("sample", element_type)],
		}
	}

	pub fn with_dataset_size(mut self, size: usize) -> Self {
		self.dataset_size = Some(size);
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	/// Seeded generators draw a different, reproducible sample per
	/// iteration
	fn rng(&self, ctx: &EvaluationContext<'_>) -> StdRng {
		match self.seed.or(ctx.config.sample_seed) {
			Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(ctx.operator_context.iteration as u64)),
			None => StdRng::from_os_rng(),
		}
	}

	fn sample_random(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		let instance = input(self.name(), inputs, 0)?;
		let Some(size) = self.dataset_size.or(instance.size()) else {
			return Err(EngineError::UnknownDatasetSize {
				operator: self.name().to_string(),
			}
			.into());
		};

		let out = output(self.name(), outputs, 0)?;
		if self.sample_size >= size {
			debug!(size, sample_size = self.sample_size, "sample covers the whole input");
			forward(instance, out)?;
		} else {
			let mut positions = index::sample(&mut self.rng(ctx), size, self.sample_size).into_vec();
			positions.sort_unstable();

			let mut wanted = positions.into_iter().peekable();
			let sampled = instance.provide_stream()?.enumerate().filter_map(move |(position, item)| {
				if wanted.peek() == Some(&position) {
					wanted.next();
					return Some(item);
				}
				item.err().map(Err)
			});
			out.accept_stream(Box::new(sampled))?;
		}
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}

	fn sample_reservoir(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		let mut rng = self.rng(ctx);
		let mut reservoir: Vec<(usize, Value)> = Vec::with_capacity(self.sample_size);
		for (position, item) in input(self.name(), inputs, 0)?.provide_stream()?.enumerate() {
			let value = item?;
			if reservoir.len() < self.sample_size {
				reservoir.push((position, value));
				continue;
			}
			let slot = rng.random_range(0..=position);
			if slot < self.sample_size {
				reservoir[slot] = (position, value);
			}
		}

		reservoir.sort_unstable_by_key(|(position, _)| *position);
		let sample: Vec<Value> = reservoir.into_iter().map(|(_, value)| value).collect();
		output(self.name(), outputs, 0)?.accept_collection(sample)?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}

impl ExecutionOperator for SampleOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"Sample"
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
		match (slot, self.method) {
			(0, SampleMethod::Random) => STREAM,
			(0, SampleMethod::Reservoir) => COLLECTION,
			_ => &[],
		}
	}

	fn execution_mode(&self) -> ExecutionMode {
		match self.method {
			SampleMethod::Random => ExecutionMode::Lazy,
			SampleMethod::Reservoir => ExecutionMode::Eager,
		}
	}

	fn evaluate(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		ensure_arity(self, inputs, outputs)?;
		match self.method {
			SampleMethod::Random => self.sample_random(inputs, outputs, ctx),
			SampleMethod::Reservoir => self.sample_reservoir(inputs, outputs, ctx),
		}
	}
}
