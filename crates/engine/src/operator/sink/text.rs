// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs::File,
	io::{BufWriter, Write},
	path::PathBuf,
};

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, Error, InputSlot, LineageCollection, OperatorId, OutputSlot, Result,
	function::FormatterDescriptor,
};
use tributary_type::error::diagnostic::io::write_failed;

use crate::{
	context::EvaluationContext,
	operator::{
		ExecutionMode, ExecutionOperator, STREAM_OR_COLLECTION, ensure_arity, input, model_eager_execution,
		open_function,
	},
};

/// Writes one formatted, newline terminated line per element
pub struct TextFileSink {
	id: OperatorId,
	path: PathBuf,
	formatter: FormatterDescriptor,
	inputs: [InputSlot; 1],
}

impl TextFileSink {
	pub fn new(id: impl Into<OperatorId>, path: impl Into<PathBuf>, formatter: FormatterDescriptor) -> Self {
		Self {
			id: id.into(),
			path: path.into(),
			inputs: [InputSlot::new("input", formatter.input_type())],
			formatter,
		}
	}

	pub fn path(&self) -> &PathBuf {
		&self.path
	}
}

impl ExecutionOperator for TextFileSink {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"TextFileSink"
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
		let formatter = open_function(self.name(), &self.formatter, &self.inputs, inputs, ctx)?;
		let failed = |err: std::io::Error| Error(write_failed(&self.path, err));

		let file = File::create(&self.path).map_err(failed)?;
		let mut writer = BufWriter::new(file);
		let mut lines = 0usize;
		for item in input(self.name(), inputs, 0)?.provide_stream()? {
			let line = formatter(&item?)?;
			writer.write_all(line.as_bytes()).map_err(failed)?;
			writer.write_all(b"\n").map_err(failed)?;
			lines += 1;
		}
		writer.flush().map_err(failed)?;
		debug!(path = %self.path.display(), lines, "wrote text file");

		model_eager_execution(self.name(), inputs, outputs, ctx)
	}
}
