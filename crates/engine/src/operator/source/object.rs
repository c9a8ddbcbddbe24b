// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fs::File, io::BufReader, path::PathBuf};

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, Error, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
};
use tributary_type::error::diagnostic::io::read_failed;

use super::FileInput;
use crate::{
	context::EvaluationContext,
	io::RecordReader,
	operator::{ExecutionMode, ExecutionOperator, STREAM, ensure_arity, model_lazy_execution, output},
};

const OBJECT_FILE: &[ChannelDescriptor] = &[ChannelDescriptor::OBJECT_FILE];

/// Decodes the elements of an object file written by an object file sink
pub struct ObjectFileSource {
	id: OperatorId,
	input: FileInput,
	inputs: Vec<InputSlot>,
	outputs: [OutputSlot; 1],
}

impl ObjectFileSource {
	pub fn new(id: impl Into<OperatorId>, path: impl Into<PathBuf>, element_type: Type) -> Self {
		Self::with_input(id.into(), FileInput::Fixed(path.into()), element_type)
	}

	pub fn from_channel(id: impl Into<OperatorId>, element_type: Type) -> Self {
		Self::with_input(id.into(), FileInput::Channel, element_type)
	}

	fn with_input(id: OperatorId, input: FileInput, element_type: Type) -> Self {
		Self {
			id,
			inputs: input.input_slots(),
			input,
			outputs: [OutputSlot::new("objects", element_type)],
		}
	}
}

impl ExecutionOperator for ObjectFileSource {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"ObjectFileSource"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match (slot, &self.input) {
			(0, FileInput::Channel) => OBJECT_FILE,
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
		let path = self.input.resolve(self.name(), inputs)?;
		debug!(path = %path.display(), "reading object file");

		let file = File::open(&path).map_err(|err| Error(read_failed(&path, err)))?;
		let records = RecordReader::new(BufReader::new(file))?;
		output(self.name(), outputs, 0)?.accept_stream(Box::new(records))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}
