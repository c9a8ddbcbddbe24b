// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fs::File, io::BufWriter, path::PathBuf};

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, Error, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
};
use tributary_type::error::diagnostic::io::write_failed;

use crate::{
	context::EvaluationContext,
	io::{ObjectRecord, RecordWriter},
	operator::{
		ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, input, model_eager_execution, output,
	},
};

const OBJECT_FILE: &[ChannelDescriptor] = &[ChannelDescriptor::OBJECT_FILE];

/// Serializes its input into an object file in batches of
/// `object_file_batch_size` elements and hands the written path on
pub struct ObjectFileSink {
	id: OperatorId,
	path: PathBuf,
	inputs: [InputSlot; 1],
	outputs: [OutputSlot; 1],
}

impl ObjectFileSink {
	pub fn new(id: impl Into<OperatorId>, path: impl Into<PathBuf>, element_type: Type) -> Self {
		Self {
			id: id.into(),
			path: path.into(),
			inputs: [InputSlot::new("input", element_type)],
			outputs: [OutputSlot::new("file", Type::Utf8)],
		}
	}
}

impl ExecutionOperator for ObjectFileSink {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"ObjectFileSink"
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
			0 => OBJECT_FILE,
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
		let batch_size = ctx.config.object_file_batch_size.max(1);

		let file = File::create(&self.path).map_err(|err| Error(write_failed(&self.path, err)))?;
		let mut writer = RecordWriter::new(BufWriter::new(file))?;
		let mut batch = Vec::with_capacity(batch_size);
		let mut records = 0usize;
		for item in input(self.name(), inputs, 0)?.provide_stream()? {
			batch.push(item?);
			if batch.len() == batch_size {
				writer.write(&ObjectRecord::Batch(std::mem::take(&mut batch)))?;
				records += 1;
			}
		}
		if !batch.is_empty() {
			writer.write(&ObjectRecord::Batch(batch))?;
			records += 1;
		}
		writer.finish()?;
		debug!(path = %self.path.display(), records, "wrote object file");

		output(self.name(), outputs, 0)?.accept_paths(vec![self.path.clone()])?;
		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}
