// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tributary_type::Type;

/// A declared operator input. Broadcast slots are side inputs resolved by
/// name rather than part of the main pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSlot {
	pub name: String,
	pub element_type: Type,
	pub broadcast: bool,
}

impl InputSlot {
	pub fn new(name: impl Into<String>, element_type: Type) -> Self {
		Self {
			name: name.into(),
			element_type,
			broadcast: false,
		}
	}

	pub fn broadcast(name: impl Into<String>, element_type: Type) -> Self {
		Self {
			name: name.into(),
			element_type,
			broadcast: true,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSlot {
	pub name: String,
	pub element_type: Type,
}

impl OutputSlot {
	pub fn new(name: impl Into<String>, element_type: Type) -> Self {
		Self {
			name: name.into(),
			element_type,
		}
	}
}
