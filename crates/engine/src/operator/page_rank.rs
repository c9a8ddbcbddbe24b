// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use indexmap::IndexSet;
use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use crate::{
	context::EvaluationContext,
	error::EngineError,
	operator::{
		COLLECTION, ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, input,
		model_eager_execution, output,
	},
};

pub const DEFAULT_DAMPING_FACTOR: f32 = 0.85;

/// Ranks the vertices of a graph given as `Tuple([source, target])` edges.
///
/// Emits `Tuple([vertex, Float4(rank)])` in order of first vertex
/// occurrence. Ranks start uniform at `1 / n`; rank held by vertices
/// without outgoing edges is not redistributed.
pub struct PageRankOperator {
	id: OperatorId,
	num_iterations: usize,
	damping_factor: f32,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl PageRankOperator {
	pub fn new(id: impl Into<OperatorId>, num_iterations: usize) -> Self {
		Self {
			id: id.into(),
			num_iterations,
			damping_factor: DEFAULT_DAMPING_FACTOR,
			inputs: [InputSlot::new("edges", Type::Tuple)],
			outputs: [OutputSlot::new("ranks", Type::Tuple)],
		}
	}

	pub fn with_damping_factor(mut self, damping_factor: f32) -> Self {
		self.damping_factor = damping_factor;
		self
	}
}

impl ExecutionOperator for PageRankOperator {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"PageRank"
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

		let mut vertices: IndexSet<Value> = IndexSet::new();
		let mut edges: Vec<(usize, usize)> = Vec::new();
		for item in input(self.name(), inputs, 0)?.provide_stream()? {
			let edge = item?;
			let Some([source, target]) = edge.as_tuple() else {
				return Err(EngineError::MalformedElement {
					operator: self.name().to_string(),
					expected: "a (source, target) edge",
					found: edge.to_string(),
				}
				.into());
			};
			let (source, _) = vertices.insert_full(source.clone());
			let (target, _) = vertices.insert_full(target.clone());
			edges.push((source, target));
		}

		let ranks = rank(vertices.len(), &edges, self.num_iterations, self.damping_factor as f64);
		debug!(vertices = vertices.len(), edges = edges.len(), iterations = self.num_iterations, "ranked graph");

		let ranked: Vec<Value> = vertices
			.into_iter()
			.zip(ranks)
			.map(|(vertex, rank)| Value::pair(vertex, Value::float4(rank as f32)))
			.collect();
		output(self.name(), outputs, 0)?.accept_collection(ranked)?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}

fn rank(n: usize, edges: &[(usize, usize)], iterations: usize, damping: f64) -> Vec<f64> {
	if n == 0 {
		return Vec::new();
	}

	let mut out_degree = vec![0usize; n];
	for &(source, _) in edges {
		out_degree[source] += 1;
	}

	let teleport = (1.0 - damping) / n as f64;
	let mut ranks = vec![1.0 / n as f64; n];
	for _ in 0..iterations {
		let mut next = vec![teleport; n];
		for &(source, target) in edges {
			next[target] += damping * ranks[source] / out_degree[source] as f64;
		}
		ranks = next;
	}
	ranks
}
