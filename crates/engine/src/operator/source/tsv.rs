// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use tracing::debug;
use tributary_core::{
	ChannelDescriptor, ChannelInstance, Error, InputSlot, LineageCollection, OperatorId, OutputSlot, Result, Type,
};
use tributary_type::error::diagnostic::io::malformed_line;

use super::FileInput;
use crate::{
	context::EvaluationContext,
	io::{LineReader, parse_tsv_line},
	operator::{ExecutionMode, ExecutionOperator, STREAM, ensure_arity, model_lazy_execution, output},
};

const TSV_FILE: &[ChannelDescriptor] = &[ChannelDescriptor::TSV_FILE];

/// Parses tab separated lines by their declared column types. A single
/// column yields scalar elements, several columns yield tuples. Empty lines
/// are skipped.
pub struct TsvFileSource {
	id: OperatorId,
	input: FileInput,
	columns: Vec<Type>,
	inputs: Vec<InputSlot>,
	outputs: [OutputSlot; 1],
}

impl TsvFileSource {
	pub fn new(id: impl Into<OperatorId>, path: impl Into<PathBuf>, columns: Vec<Type>) -> Self {
		Self::with_input(id.into(), FileInput::Fixed(path.into()), columns)
	}

	pub fn from_channel(id: impl Into<OperatorId>, columns: Vec<Type>) -> Self {
		Self::with_input(id.into(), FileInput::Channel, columns)
	}

	fn with_input(id: OperatorId, input: FileInput, columns: Vec<Type>) -> Self {
		let element_type = match columns.as_slice() {
			[single] => *single,
			_ => Type::Tuple,
		};
		Self {
			id,
			inputs: input.input_slots(),
			input,
			columns,
			outputs: [OutputSlot::new("records", element_type)],
		}
	}
}

impl ExecutionOperator for TsvFileSource {
	fn id(&self) -> OperatorId {
		self.id
	}

	fn name(&self) -> &'static str {
		"TsvFileSource"
	}

	fn input_slots(&self) -> &[InputSlot] {
		&self.inputs
	}

	fn output_slots(&self) -> &[OutputSlot] {
		&self.outputs
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		match (slot, &self.input) {
			(0, FileInput::Channel) => TSV_FILE,
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
		debug!(path = %path.display(), columns = self.columns.len(), "reading tsv file");

		let columns = self.columns.clone();
		let lines = LineReader::open(&path)?;
		let records = lines.enumerate().filter_map(move |(idx, line)| match line {
			Ok(line) if line.trim().is_empty() => None,
			Ok(line) => Some(
				parse_tsv_line(&line, &columns).map_err(|reason| Error(malformed_line(&path, idx + 1, reason))),
			),
			Err(err) => Some(Err(err)),
		});

		output(self.name(), outputs, 0)?.accept_stream(Box::new(records))?;
		model_lazy_execution(self.name(), inputs, outputs, ctx)
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tributary_core::Value;
	use tributary_testing::tempdir::temp_dir;

	use super::*;
	use crate::operator::harness::*;

	#[test]
	fn test_pairs() {
		temp_dir(|dir| {
			let path = dir.join("points.tsv");
			fs::write(&path, "1\t0.5\n2\t1.5\n\n")?;

			let mut h = Harness::new();
			let source = TsvFileSource::new(1, &path, vec![Type::Int4, Type::Float4]);
			let mut out = h.run(&source, vec![], ChannelDescriptor::STREAM).unwrap();
			assert_eq!(
				drain(&mut out),
				vec![
					Value::pair(Value::int4(1), Value::float4(0.5f32)),
					Value::pair(Value::int4(2), Value::float4(1.5f32)),
				]
			);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_single_column() {
		temp_dir(|dir| {
			let path = dir.join("numbers.tsv");
			fs::write(&path, "10\n20\n")?;

			let mut h = Harness::new();
			let source = TsvFileSource::new(1, &path, vec![Type::Int8]);
			assert_eq!(source.output_slots()[0].element_type, Type::Int8);

			let mut out = h.run(&source, vec![], ChannelDescriptor::STREAM).unwrap();
			assert_eq!(drain(&mut out), vec![Value::int8(10i64), Value::int8(20i64)]);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_malformed_line_reported_lazily() {
		temp_dir(|dir| {
			let path = dir.join("broken.tsv");
			fs::write(&path, "1\n\nnope\n")?;

			let mut h = Harness::new();
			let source = TsvFileSource::new(1, &path, vec![Type::Int4]);
			let mut out = h.run(&source, vec![], ChannelDescriptor::STREAM).unwrap();

			let items: Vec<_> = out.provide_stream().unwrap().collect();
			assert_eq!(items.len(), 2);
			assert_eq!(items[0].as_ref().unwrap(), &Value::int4(1));
			let err = items[1].as_ref().unwrap_err();
			assert_eq!(err.code, "IO_004");
			assert!(err.message.contains("line 3"), "{}", err.message);
			Ok(())
		})
		.unwrap();
	}
}
