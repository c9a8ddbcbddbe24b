// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt::Display, path::Path};

use crate::error::diagnostic::Diagnostic;

pub fn io_error(err: std::io::Error) -> Diagnostic {
	Diagnostic {
		code: "IO_001".to_string(),
		message: format!("I/O error: {}", err),
		task: None,
		label: Some(format!("{:?}", err.kind())),
		help: None,
		notes: vec![],
		cause: None,
	}
}

/// Reading from an external file failed
pub fn read_failed(path: impl AsRef<Path>, reason: impl Display) -> Diagnostic {
	Diagnostic {
		code: "IO_001".to_string(),
		message: format!("Reading {} failed: {}", path.as_ref().display(), reason),
		task: None,
		label: None,
		help: Some("Check that the file exists and is readable".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// Writing to an external file failed
pub fn write_failed(path: impl AsRef<Path>, reason: impl Display) -> Diagnostic {
	Diagnostic {
		code: "IO_002".to_string(),
		message: format!("Writing {} failed: {}", path.as_ref().display(), reason),
		task: None,
		label: None,
		help: Some("Check that the target directory exists and is writable".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// An object file record or header could not be decoded
pub fn malformed_record(reason: impl Display) -> Diagnostic {
	Diagnostic {
		code: "IO_003".to_string(),
		message: format!("Malformed object file record: {}", reason),
		task: None,
		label: None,
		help: Some("Object files must be written by an object file sink".to_string()),
		notes: vec![],
		cause: None,
	}
}

/// A line of a text or TSV file could not be parsed
pub fn malformed_line(path: impl AsRef<Path>, line: usize, reason: impl Display) -> Diagnostic {
	Diagnostic {
		code: "IO_004".to_string(),
		message: format!("Malformed line {} in {}: {}", line, path.as_ref().display(), reason),
		task: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn no_single_file(dir: impl AsRef<Path>, found: usize) -> Diagnostic {
	Diagnostic {
		code: "IO_005".to_string(),
		message: format!("Expected exactly one data file in {}, found {}", dir.as_ref().display(), found),
		task: None,
		label: None,
		help: Some("Hidden files and files starting with '_' are ignored".to_string()),
		notes: vec![],
		cause: None,
	}
}
