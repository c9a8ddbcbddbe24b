// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use crate::{
	context::CostEstimate,
	lineage::{AtomicExecution, LineageCollection},
};

/// Aggregated cost and time of the atomic executions resolved by one force
/// of the lineage graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialExecution {
	atomic_executions: Vec<AtomicExecution>,
	duration: Duration,
}

impl PartialExecution {
	/// Returns `None` when the collection holds no atomic execution
	pub fn new(collection: LineageCollection, duration: Duration) -> Option<Self> {
		let atomic_executions = collection.into_atomic_executions();
		if atomic_executions.is_empty() {
			return None;
		}
		Some(Self {
			atomic_executions,
			duration,
		})
	}

	pub fn atomic_executions(&self) -> &[AtomicExecution] {
		&self.atomic_executions
	}

	pub fn operators(&self) -> Vec<&str> {
		self.atomic_executions.iter().map(|a| a.operator.as_str()).collect()
	}

	pub fn duration(&self) -> Duration {
		self.duration
	}

	pub fn cost(&self) -> CostEstimate {
		self.atomic_executions.iter().fold(CostEstimate::zero(), |acc, a| acc + a.cost)
	}
}
