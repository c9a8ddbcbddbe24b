// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use tributary_type::Type;

use crate::lineage::LineageGraph;

pub mod instance;

use instance::ChannelInstance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
	/// One element per line
	Text,
	/// Tab separated fields, one element per line
	Tsv,
	/// Length-prefixed serialized records
	Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
	/// Lazy, single-pass sequence
	Stream,
	/// Materialized, replayable sequence of known size
	Collection,
	/// Resolved file-system paths
	File(FileFormat),
}

impl Display for ChannelKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ChannelKind::Stream => f.write_str("Stream"),
			ChannelKind::Collection => f.write_str("Collection"),
			ChannelKind::File(FileFormat::Text) => f.write_str("File(Text)"),
			ChannelKind::File(FileFormat::Tsv) => f.write_str("File(Tsv)"),
			ChannelKind::File(FileFormat::Object) => f.write_str("File(Object)"),
		}
	}
}

/// Identity and capabilities of a data transport between two operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelDescriptor {
	pub kind: ChannelKind,
	/// Whether the data can be read more than once or by more than one
	/// consumer
	pub reusable: bool,
}

impl ChannelDescriptor {
	pub const STREAM: ChannelDescriptor = ChannelDescriptor::new(ChannelKind::Stream, false);
	pub const COLLECTION: ChannelDescriptor = ChannelDescriptor::new(ChannelKind::Collection, true);
	pub const TEXT_FILE: ChannelDescriptor = ChannelDescriptor::new(ChannelKind::File(FileFormat::Text), true);
	pub const TSV_FILE: ChannelDescriptor = ChannelDescriptor::new(ChannelKind::File(FileFormat::Tsv), true);
	pub const OBJECT_FILE: ChannelDescriptor =
		ChannelDescriptor::new(ChannelKind::File(FileFormat::Object), true);

	pub const fn new(kind: ChannelKind, reusable: bool) -> Self {
		Self {
			kind,
			reusable,
		}
	}

	pub const fn is_reusable(&self) -> bool {
		self.reusable
	}

	/// Whether this descriptor appears, by kind, in a capability list
	pub fn is_supported_by(&self, supported: &[ChannelDescriptor]) -> bool {
		supported.iter().any(|d| d.kind == self.kind)
	}
}

impl Display for ChannelDescriptor {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.kind, f)
	}
}

/// A channel descriptor bound to the type of element it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
	pub descriptor: ChannelDescriptor,
	pub element_type: Type,
}

impl Channel {
	pub fn new(descriptor: ChannelDescriptor, element_type: Type) -> Self {
		Self {
			descriptor,
			element_type,
		}
	}

	pub fn stream(element_type: Type) -> Self {
		Self::new(ChannelDescriptor::STREAM, element_type)
	}

	pub fn collection(element_type: Type) -> Self {
		Self::new(ChannelDescriptor::COLLECTION, element_type)
	}

	pub fn file(format: FileFormat) -> Self {
		let descriptor = match format {
			FileFormat::Text => ChannelDescriptor::TEXT_FILE,
			FileFormat::Tsv => ChannelDescriptor::TSV_FILE,
			FileFormat::Object => ChannelDescriptor::OBJECT_FILE,
		};
		Self::new(descriptor, Type::Any)
	}

	pub fn kind(&self) -> ChannelKind {
		self.descriptor.kind
	}

	/// Binds this channel to a fresh runtime instance for one
	/// producer/consumer edge. The instance gets its own lineage node.
	pub fn create_instance(&self, lineage: &mut LineageGraph) -> ChannelInstance {
		let node = lineage.add_channel(self.descriptor);
		ChannelInstance::new(*self, node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_supported_by_matches_kind() {
		let supported = [ChannelDescriptor::COLLECTION, ChannelDescriptor::STREAM];
		assert!(ChannelDescriptor::STREAM.is_supported_by(&supported));
		assert!(!ChannelDescriptor::TEXT_FILE.is_supported_by(&supported));
		assert!(!ChannelDescriptor::STREAM.is_supported_by(&[]));
	}

	#[test]
	fn test_reusability() {
		assert!(!ChannelDescriptor::STREAM.is_reusable());
		assert!(ChannelDescriptor::COLLECTION.is_reusable());
		assert!(ChannelDescriptor::OBJECT_FILE.is_reusable());
	}

	#[test]
	fn test_create_instance_registers_lineage() {
		let mut lineage = LineageGraph::new();
		let a = Channel::stream(Type::Int4).create_instance(&mut lineage);
		let b = Channel::collection(Type::Int4).create_instance(&mut lineage);
		assert_ne!(a.lineage(), b.lineage());
		assert_eq!(lineage.len(), 2);
	}
}
