// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Reading and writing of the external file formats: line-delimited text,
//! tab separated values and object files.

pub mod lines;
pub mod path;
pub mod record;

pub use lines::{LineReader, parse_field, parse_tsv_line};
pub use path::resolve_single_path;
pub use record::{ObjectRecord, RecordReader, RecordWriter};
