// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use tributary_core::{ChannelInstance, InputSlot, Result, Type};

use crate::{io::resolve_single_path, operator::input};

mod collection;
mod object;
mod text;
mod tsv;

pub use collection::CollectionSource;
pub use object::ObjectFileSource;
pub use text::TextFileSource;
pub use tsv::TsvFileSource;

/// Where a file source finds its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileInput {
	Fixed(PathBuf),
	/// Read from the single path of a file channel on input slot 0
	Channel,
}

impl FileInput {
	pub(crate) fn input_slots(&self) -> Vec<InputSlot> {
		match self {
			FileInput::Fixed(_) => vec![],
			FileInput::Channel => vec![InputSlot::new("path", Type::Utf8)],
		}
	}

	pub(crate) fn resolve(&self, operator: &str, inputs: &mut [Option<ChannelInstance>]) -> Result<PathBuf> {
		match self {
			FileInput::Fixed(path) => resolve_single_path(path),
			FileInput::Channel => {
				let instance = input(operator, inputs, 0)?;
				resolve_single_path(instance.single_path()?)
			}
		}
	}
}
