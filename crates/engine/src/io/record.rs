// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Object files: a fixed header followed by records, each a little-endian
//! `u32` length and a postcard encoded [`ObjectRecord`].

use std::{
	collections::VecDeque,
	io::{ErrorKind, Read, Write},
};

use serde::{Deserialize, Serialize};
use tributary_core::{Error, Result, Value};
use tributary_type::{err, error::diagnostic::io::malformed_record};

pub const MAGIC: &[u8; 8] = b"TRBOBJ01";

/// One serialized record. The tag tells whether the record carries a single
/// element or a batch of them; both may appear in the same file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectRecord {
	Single(Value),
	Batch(Vec<Value>),
}

pub struct RecordWriter<W: Write> {
	writer: W,
}

impl<W: Write> RecordWriter<W> {
	pub fn new(mut writer: W) -> Result<Self> {
		writer.write_all(MAGIC)?;
		Ok(Self {
			writer,
		})
	}

	pub fn write(&mut self, record: &ObjectRecord) -> Result<()> {
		let bytes = postcard::to_allocvec(record)?;
		let len = match u32::try_from(bytes.len()) {
			Ok(len) => len,
			Err(_) => return err!(malformed_record(format!("record of {} bytes is too large", bytes.len()))),
		};
		self.writer.write_all(&len.to_le_bytes())?;
		self.writer.write_all(&bytes)?;
		Ok(())
	}

	pub fn finish(mut self) -> Result<W> {
		self.writer.flush()?;
		Ok(self.writer)
	}
}

/// Lazily decodes the elements of an object file. A decoding failure is
/// yielded once, after which the reader is exhausted.
pub struct RecordReader<R: Read> {
	reader: R,
	pending: VecDeque<Value>,
	failed: bool,
}

impl<R: Read> RecordReader<R> {
	pub fn new(mut reader: R) -> Result<Self> {
		let mut header = [0u8; 8];
		if reader.read_exact(&mut header).is_err() || &header != MAGIC {
			return err!(malformed_record("missing object file header"));
		}
		Ok(Self {
			reader,
			pending: VecDeque::new(),
			failed: false,
		})
	}

	fn next_record(&mut self) -> Result<Option<ObjectRecord>> {
		let mut len = [0u8; 4];
		let mut filled = 0;
		while filled < len.len() {
			match self.reader.read(&mut len[filled..]) {
				Ok(0) => break,
				Ok(n) => filled += n,
				Err(e) if e.kind() == ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		}

		match filled {
			0 => return Ok(None),
			4 => {}
			_ => return err!(malformed_record("truncated record length")),
		}

		let len = u32::from_le_bytes(len) as u64;
		let mut bytes = Vec::new();
		(&mut self.reader).take(len).read_to_end(&mut bytes)?;
		if bytes.len() as u64 != len {
			return err!(malformed_record(format!("truncated record: expected {} bytes, found {}", len, bytes.len())));
		}
		Ok(Some(postcard::from_bytes(&bytes)?))
	}
}

impl<R: Read> Iterator for RecordReader<R> {
	type Item = Result<Value>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(value) = self.pending.pop_front() {
				return Some(Ok(value));
			}
			if self.failed {
				return None;
			}
			match self.next_record() {
				Ok(None) => return None,
				Ok(Some(ObjectRecord::Single(value))) => return Some(Ok(value)),
				Ok(Some(ObjectRecord::Batch(values))) => self.pending.extend(values),
				Err(err) => {
					self.failed = true;
					return Some(Err::<Value, Error>(err));
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	fn encode(records: &[ObjectRecord]) -> Vec<u8> {
		let mut writer = RecordWriter::new(Vec::new()).unwrap();
		for record in records {
			writer.write(record).unwrap();
		}
		writer.finish().unwrap()
	}

	#[test]
	fn test_mixed_record_kinds() {
		let bytes = encode(&[
			ObjectRecord::Single(Value::int4(1)),
			ObjectRecord::Batch(vec![Value::int4(2), Value::utf8("three")]),
			ObjectRecord::Batch(vec![]),
			ObjectRecord::Single(Value::pair(Value::int4(4), Value::float8(4.5))),
		]);

		let values: Vec<Value> = RecordReader::new(Cursor::new(bytes)).unwrap().map(|v| v.unwrap()).collect();
		assert_eq!(
			values,
			vec![
				Value::int4(1),
				Value::int4(2),
				Value::utf8("three"),
				Value::pair(Value::int4(4), Value::float8(4.5)),
			]
		);
	}

	#[test]
	fn test_missing_header() {
		let err = RecordReader::new(Cursor::new(b"garbage!".to_vec())).err().unwrap();
		assert_eq!(err.code, "IO_003");
	}

	#[test]
	fn test_truncated_record_fails_once() {
		let mut bytes = encode(&[ObjectRecord::Single(Value::utf8("complete"))]);
		bytes.extend_from_slice(&100u32.to_le_bytes());
		bytes.extend_from_slice(&[1, 2, 3]);

		let mut reader = RecordReader::new(Cursor::new(bytes)).unwrap();
		assert_eq!(reader.next().unwrap().unwrap(), Value::utf8("complete"));
		assert_eq!(reader.next().unwrap().unwrap_err().code, "IO_003");
		assert!(reader.next().is_none());
	}

	#[test]
	fn test_length_beyond_data() {
		let mut bytes = encode(&[]);
		bytes.extend_from_slice(&u32::MAX.to_le_bytes());
		bytes.extend_from_slice(&[0x01, 0x02]);

		let mut reader = RecordReader::new(Cursor::new(bytes)).unwrap();
		let err = reader.next().unwrap().unwrap_err();
		assert_eq!(err.code, "IO_003");
		assert!(err.message.contains("found 2"));
		assert!(reader.next().is_none());
	}
}
