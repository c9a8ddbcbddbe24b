// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs::File,
	io::{BufRead, BufReader, Lines},
	path::{Path, PathBuf},
};

use tributary_core::{Error, Result, Type, Value};
use tributary_type::error::diagnostic::io::read_failed;

/// Lazily reads the lines of a file. An I/O failure is yielded once as an
/// `Err` item, after which the reader is exhausted.
pub struct LineReader {
	path: PathBuf,
	lines: Lines<BufReader<File>>,
	failed: bool,
}

impl LineReader {
	pub fn open(path: &Path) -> Result<Self> {
		let file = File::open(path).map_err(|err| Error(read_failed(path, err)))?;
		Ok(Self {
			path: path.to_path_buf(),
			lines: BufReader::new(file).lines(),
			failed: false,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Iterator for LineReader {
	type Item = Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}
		match self.lines.next()? {
			Ok(line) => Some(Ok(line)),
			Err(err) => {
				self.failed = true;
				Some(Err(Error(read_failed(&self.path, err))))
			}
		}
	}
}

/// Parses one text field as a value of the given type
pub fn parse_field(text: &str, ty: Type) -> std::result::Result<Value, String> {
	let trimmed = text.trim();
	match ty {
		Type::Boolean => trimmed.parse::<bool>().map(Value::Boolean).map_err(|err| err.to_string()),
		Type::Int4 => trimmed.parse::<i32>().map(Value::Int4).map_err(|err| err.to_string()),
		Type::Int8 => trimmed.parse::<i64>().map(Value::Int8).map_err(|err| err.to_string()),
		Type::Float4 => trimmed.parse::<f32>().map(Value::float4).map_err(|err| err.to_string()),
		Type::Float8 => trimmed.parse::<f64>().map(Value::float8).map_err(|err| err.to_string()),
		Type::Utf8 | Type::Any => Ok(Value::utf8(text)),
		Type::Undefined | Type::Tuple => Err(format!("cannot parse a field as {}", ty)),
	}
}

/// Parses a tab separated line. A single column yields the bare value,
/// several columns yield a tuple.
pub fn parse_tsv_line(line: &str, columns: &[Type]) -> std::result::Result<Value, String> {
	let fields: Vec<&str> = line.split('\t').collect();
	if fields.len() != columns.len() {
		return Err(format!("expected {} fields, found {}", columns.len(), fields.len()));
	}

	let mut values = Vec::with_capacity(fields.len());
	for (field, ty) in fields.into_iter().zip(columns.iter()) {
		values.push(parse_field(field, *ty)?);
	}

	if values.len() == 1 {
		Ok(values.remove(0))
	} else {
		Ok(Value::Tuple(values))
	}
}
