// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type, Value,
};

use super::FileInput;
use crate::{
	context::EvaluationContext,
	io::LineReader,
	operator::{ExecutionMode, ExecutionOperator, STREAM, ensure_arity, model_lazy_execution, output},
};

const TEXT_FILE: &[ChannelDescriptor] = &[ChannelDescriptor::TEXT_FILE];

/// Emits each line of a text file as a `Utf8` element, without the line
/// terminator
pub struct TextFileSource {
	id: OperatorId,
	input: FileInput,
	inputs: Vec<InputSlot>,
	outputs: [OutputSlot; 1],
}

impl TextFileSource {
	pub fn new(id: impl Into<OperatorId>, path: impl Into<PathBuf>) -> Self {
		Self::with_input(id.into(), FileInput::Fixed(path.into()))
	}

	/// Reads its path from a text file channel
	pub fn from_channel(id: impl Into<OperatorId>) -> Self {
		Self::with_input(id.into(), FileInput::Channel)
	}

	fn with_input(id: OperatorId, input: FileInput) -> Self {
		Self {
			id,
			inputs: input.input_slots(),
			input,
			outputs: [OutputSlot::new("lines", Type::Utf8)],
		}
	}
}

impl ExecutionOperator for TextFileSource {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"TextFileSource"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match (slot, &self.input) {
			(0, FileInput::Channel) => TEXT_FILE,
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
		debug!(path = %path.display(), "reading text file");

		let lines = LineReader::open(&path)?;
		output(self.name(), outputs, 0)?.accept_stream(Box::new(lines.map(|line| line.map(Value::Utf8))))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tributary_core::{Channel, FileFormat};
	use tributary_testing::tempdir::temp_dir;

	use super::*;
	use crate::operator::harness::*;

	#[test]
	fn test_reads_lines() {
		temp_dir(|dir| {
			let path = dir.join("words.txt");
			fs::write(&path, "alpha\nbeta\n\ngamma")?;

			let mut h = Harness::new();
			let mut out = h.run(&TextFileSource::new(1, &path), vec![], ChannelDescriptor::STREAM).unwrap();
			assert_eq!(
				drain(&mut out),
				vec![Value::utf8("alpha"), Value::utf8("beta"), Value::utf8(""), Value::utf8("gamma")]
			);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_path_from_channel_directory() {
		temp_dir(|dir| {
			let data = dir.join("data");
			fs::create_dir(&data)?;
			fs::write(data.join("part-0"), "x\ny\n")?;
			fs::write(data.join("_SUCCESS"), "")?;

			let mut h = Harness::new();
			let mut file = Channel::file(FileFormat::Text).create_instance(&mut h.lineage);
			file.accept_paths(vec![data.clone()]).unwrap();

			let mut out =
				h.run(&TextFileSource::from_channel(1), vec![Some(file)], ChannelDescriptor::STREAM).unwrap();
			assert_eq!(drain(&mut out), vec![Value::utf8("x"), Value::utf8("y")]);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_missing_file() {
		temp_dir(|dir| {
			let mut h = Harness::new();
			let err = h
				.run(&TextFileSource::new(1, dir.join("missing.txt")), vec![], ChannelDescriptor::STREAM)
				.unwrap_err();
			assert_eq!(err.code, "IO_001");
			Ok(())
		})
		.unwrap();
	}
}
