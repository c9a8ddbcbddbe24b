// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use crate::{
	context::EvaluationContext,
	operator::{COLLECTION_OR_STREAM, ExecutionMode, ExecutionOperator, ensure_arity, model_eager_execution, output},
};

/// Feeds an in-memory collection into the plan
pub struct CollectionSource {
	id: OperatorId,
	data: Arc<Vec<Value>>,
	outputs: [OutputSlot; 1],
}

impl CollectionSource {
	pub fn new(id: impl Into<OperatorId>, data: impl Into<Arc<Vec<Value>>>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			data: data.into(),
			outputs: [OutputSlot::new("output", element_type)],
		}
	}

	pub fn data(&self) -> &Arc<Vec<Value>> {
		&self.data
	}
}

impl ExecutionOperator for CollectionSource {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"CollectionSource"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&[]
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, _slot: usize) -> &'static [ChannelDescriptor] {
		&[]
	}

	fn supported_output_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 => COLLECTION_OR_STREAM,
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
		output(self.name(), outputs, 0)?.accept_collection(Arc::clone(&self.data))?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}
