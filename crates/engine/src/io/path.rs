// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs,
	path::{Path, PathBuf},
};

use tributary_core::{Error, Result};
use tributary_type::{err, error::diagnostic::io};

/// Resolves a possibly partitioned input path to the single data file it
/// denotes. Plain files resolve to themselves; a directory must contain
/// exactly one data file, ignoring hidden and `_`-prefixed entries.
pub fn resolve_single_path(path: &Path) -> Result<PathBuf> {
	if !path.is_dir() {
		return Ok(path.to_path_buf());
	}

	let mut files = Vec::new();
	for entry in fs::read_dir(path).map_err(|err| Error(io::read_failed(path, err)))? {
		let entry = entry?;
		let name = entry.file_name();
		let name = name.to_string_lossy();
		if name.starts_with('.') || name.starts_with('_') {
			continue;
		}
		if entry.file_type()?.is_file() {
			files.push(entry.path());
		}
	}

	if files.len() == 1 {
		Ok(files.remove(0))
	} else {
		err!(io::no_single_file(path, files.len()))
	}
}

#[cfg(test)]
mod tests {
	use tributary_testing::tempdir::temp_dir;

	use super::*;

	#[test]
	fn test_plain_file_resolves_to_itself() {
		temp_dir(|dir| {
			let file = dir.join("data.txt");
			fs::write(&file, "1\n")?;
			assert_eq!(resolve_single_path(&file).unwrap(), file);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_directory_with_single_data_file() {
		temp_dir(|dir| {
			fs::write(dir.join("part-00000"), "1\n")?;
			fs::write(dir.join("_SUCCESS"), "")?;
			fs::write(dir.join(".part-00000.crc"), "")?;
			assert_eq!(resolve_single_path(dir).unwrap(), dir.join("part-00000"));
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_directory_with_many_files() {
		temp_dir(|dir| {
			fs::write(dir.join("a"), "")?;
			fs::write(dir.join("b"), "")?;
			assert_eq!(resolve_single_path(dir).unwrap_err().code, "IO_005");
			Ok(())
		})
		.unwrap();
	}
}
