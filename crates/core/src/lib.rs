// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod channel;
pub mod context;
pub mod function;
pub mod lineage;
pub mod slot;

pub use channel::{
	Channel, ChannelDescriptor, ChannelKind, FileFormat,
	instance::{ChannelInstance, DataStream},
};
pub use context::{CardinalityEstimate, CostEstimate, OperatorContext, OperatorId};
pub use lineage::{
	AtomicExecution, LineageCollection, LineageGraph, LineageNodeId,
	partial::PartialExecution,
};
pub use slot::{InputSlot, OutputSlot};
pub use tributary_type::{Error, Result, Type, Value, error::diagnostic};
