// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Debug, Formatter},
	path::{Path, PathBuf},
	sync::Arc,
};

use tracing::trace;
use tributary_type::{Result, Value, err, error::diagnostic::channel, return_error};

use crate::{
	channel::{Channel, ChannelDescriptor, ChannelKind},
	lineage::LineageNodeId,
};

/// A lazy, single-pass sequence of elements. Exhaustion is signalled by
/// `None`, failures by an `Err` item.
pub type DataStream = Box<dyn Iterator<Item = Result<Value>> + Send>;

/// Streams the elements of a shared collection without copying the
/// collection itself.
pub fn collection_stream(data: Arc<Vec<Value>>) -> DataStream {
	let len = data.len();
	Box::new((0..len).map(move |idx| Ok(data[idx].clone())))
}

enum StreamState {
	Pending,
	Ready(DataStream),
	Consumed,
}

impl Debug for StreamState {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			StreamState::Pending => f.write_str("Pending"),
			StreamState::Ready(_) => f.write_str("Ready"),
			StreamState::Consumed => f.write_str("Consumed"),
		}
	}
}

#[derive(Debug)]
pub struct StreamInstance {
	channel: Channel,
	lineage: LineageNodeId,
	state: StreamState,
}

#[derive(Debug, Clone)]
pub struct CollectionInstance {
	channel: Channel,
	lineage: LineageNodeId,
	data: Option<Arc<Vec<Value>>>,
}

#[derive(Debug, Clone)]
pub struct FileInstance {
	channel: Channel,
	lineage: LineageNodeId,
	paths: Option<Vec<PathBuf>>,
}

/// The runtime binding of a [`Channel`] to one producer/consumer edge.
///
/// Stream instances are deliberately not `Clone`: the single consumer owns
/// the instance and `provide_stream` can hand out the sequence only once.
#[derive(Debug)]
pub enum ChannelInstance {
	Stream(StreamInstance),
	Collection(CollectionInstance),
	File(FileInstance),
}

impl ChannelInstance {
	pub fn new(channel: Channel, lineage: LineageNodeId) -> Self {
		match channel.kind() {
			ChannelKind::Stream => ChannelInstance::Stream(StreamInstance {
				channel,
				lineage,
				state: StreamState::Pending,
			}),
			ChannelKind::Collection => ChannelInstance::Collection(CollectionInstance {
				channel,
				lineage,
				data: None,
			}),
			ChannelKind::File(_) => ChannelInstance::File(FileInstance {
				channel,
				lineage,
				paths: None,
			}),
		}
	}

	pub fn channel(&self) -> &Channel {
		match self {
			ChannelInstance::Stream(s) => &s.channel,
			ChannelInstance::Collection(c) => &c.channel,
			ChannelInstance::File(f) => &f.channel,
		}
	}

	pub fn descriptor(&self) -> ChannelDescriptor {
		self.channel().descriptor
	}

	pub fn kind(&self) -> ChannelKind {
		self.channel().kind()
	}

	/// The lineage node tracking the producer of this instance
	pub fn lineage(&self) -> LineageNodeId {
		match self {
			ChannelInstance::Stream(s) => s.lineage,
			ChannelInstance::Collection(c) => c.lineage,
			ChannelInstance::File(f) => f.lineage,
		}
	}

	pub fn name(&self) -> String {
		format!("{}#{}", self.kind(), self.lineage())
	}

	pub fn is_produced(&self) -> bool {
		match self {
			ChannelInstance::Stream(s) => !matches!(s.state, StreamState::Pending),
			ChannelInstance::Collection(c) => c.data.is_some(),
			ChannelInstance::File(f) => f.paths.is_some(),
		}
	}

	/// Whether a stream instance has handed out its sequence
	pub fn is_consumed(&self) -> bool {
		match self {
			ChannelInstance::Stream(s) => matches!(s.state, StreamState::Consumed),
			_ => false,
		}
	}

	pub fn accept_stream(&mut self, stream: DataStream) -> Result<()> {
		let name = self.name();
		match self {
			ChannelInstance::Stream(s) => {
				if !matches!(s.state, StreamState::Pending) {
					return_error!(channel::already_accepted(name));
				}
				trace!(instance = %name, "accepted stream");
				s.state = StreamState::Ready(stream);
				Ok(())
			}
			_ => err!(channel::representation_mismatch(name, "stream")),
		}
	}

	pub fn accept_collection(&mut self, data: impl Into<Arc<Vec<Value>>>) -> Result<()> {
		let name = self.name();
		match self {
			ChannelInstance::Stream(s) => {
				if !matches!(s.state, StreamState::Pending) {
					return_error!(channel::already_accepted(name));
				}
				s.state = StreamState::Ready(collection_stream(data.into()));
				Ok(())
			}
			ChannelInstance::Collection(c) => {
				if c.data.is_some() {
					return_error!(channel::already_accepted(name));
				}
				let data = data.into();
				trace!(instance = %name, size = data.len(), "accepted collection");
				c.data = Some(data);
				Ok(())
			}
			ChannelInstance::File(_) => err!(channel::representation_mismatch(name, "collection")),
		}
	}

	pub fn accept_paths(&mut self, paths: Vec<PathBuf>) -> Result<()> {
		let name = self.name();
		match self {
			ChannelInstance::File(f) => {
				if f.paths.is_some() {
					return_error!(channel::already_accepted(name));
				}
				f.paths = Some(paths);
				Ok(())
			}
			_ => err!(channel::representation_mismatch(name, "file")),
		}
	}

	/// Hands out the data as a lazy sequence. A stream instance does so
	/// exactly once; a collection instance any number of times.
	pub fn provide_stream(&mut self) -> Result<DataStream> {
		let name = self.name();
		match self {
			ChannelInstance::Stream(s) => match std::mem::replace(&mut s.state, StreamState::Consumed) {
				StreamState::Ready(stream) => {
					trace!(instance = %name, "consumed stream");
					Ok(stream)
				}
				StreamState::Consumed => err!(channel::reuse_violation(name)),
				StreamState::Pending => {
					s.state = StreamState::Pending;
					err!(channel::not_produced(name))
				}
			},
			ChannelInstance::Collection(c) => match &c.data {
				Some(data) => Ok(collection_stream(Arc::clone(data))),
				None => err!(channel::not_produced(name)),
			},
			ChannelInstance::File(_) => err!(channel::representation_mismatch(name, "stream")),
		}
	}

	pub fn provide_collection(&self) -> Result<Arc<Vec<Value>>> {
		match self {
			ChannelInstance::Collection(c) => match &c.data {
				Some(data) => Ok(Arc::clone(data)),
				None => err!(channel::not_produced(self.name())),
			},
			_ => err!(channel::representation_mismatch(self.name(), "collection")),
		}
	}

	/// Number of elements, known only for produced collections
	pub fn size(&self) -> Option<usize> {
		match self {
			ChannelInstance::Collection(c) => c.data.as_ref().map(|data| data.len()),
			_ => None,
		}
	}

	pub fn paths(&self) -> Result<&[PathBuf]> {
		match self {
			ChannelInstance::File(f) => match &f.paths {
				Some(paths) => Ok(paths.as_slice()),
				None => err!(channel::not_produced(self.name())),
			},
			_ => err!(channel::representation_mismatch(self.name(), "file")),
		}
	}

	pub fn single_path(&self) -> Result<&Path> {
		let paths = self.paths()?;
		match paths {
			[path] => Ok(path.as_path()),
			_ => err!(channel::not_single_path(self.name(), paths.len())),
		}
	}

	/// Another handle on the same data for reusable instances. Stream
	/// instances cannot be shared.
	pub fn share(&self) -> Option<ChannelInstance> {
		match self {
			ChannelInstance::Stream(_) => None,
			ChannelInstance::Collection(c) => Some(ChannelInstance::Collection(c.clone())),
			ChannelInstance::File(f) => Some(ChannelInstance::File(f.clone())),
		}
	}
}
