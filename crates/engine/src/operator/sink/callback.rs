// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use parking_lot::Mutex;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
	function::CallbackDescriptor,
};

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, input, model_eager_execution,
		open_function,
	},
};

/// Hands every element to a callback
pub struct LocalCallbackSink {
	id: OperatorId,
	callback: CallbackDescriptor,
	inputs: [InputSlot; 1],
}

impl LocalCallbackSink {
	pub fn new(id: impl Into<OperatorId>, callback: CallbackDescriptor) -> Self {
		Self {
			id: id.into(),
			inputs: [InputSlot::new("input", callback.input_type())],
			callback,
		}
	}

	/// A sink appending every element to the returned buffer
	pub fn collecting(id: impl Into<OperatorId>, element_type: Type) -> (Self, Arc<Mutex<Vec<Value>>>) {
		let buffer = Arc::new(Mutex::new(Vec::new()));
		let target = Arc::clone(&buffer);
		let callback = CallbackDescriptor::from_fn(
			move |value| {
				target.lock().push(value.clone());
				Ok(())
			},
			element_type,
		);
		(Self::new(id, callback), buffer)
	}
}

impl ExecutionOperator for LocalCallbackSink {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"LocalCallbackSink"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&[]
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match slot {
			0 => STREAM_OR_COLLECTION,
			_ => &[],
		}
	}

	fn supported_output_channels(&self, _slot: usize) -> &'static [ChannelDescriptor] {
		&[]
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
		let callback = open_function(self.name(), &self.callback, &self.inputs, inputs, ctx)?;

		for item in input(self.name(), inputs, 0)?.provide_stream()? {
			callback(&item?)?;
		}
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}
