// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::Mutex;
use tributary_core::{OperatorId, PartialExecution};

/// The enclosing job an executor reports to. Reports are advisory; they
/// never influence execution.
pub trait Job: Send + Sync {
	fn report_progress(&self, operator: &str, percent: u8);

	fn add_partial_execution(&self, partial_execution: PartialExecution);

	fn register_measured_cardinality(&self, operator: OperatorId, slot: usize, cardinality: usize);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
	pub operator: String,
	pub percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredCardinality {
	pub operator: OperatorId,
	pub slot: usize,
	pub cardinality: usize,
}

#[derive(Debug, Default)]
struct JobRecord {
	progress: Vec<ProgressEvent>,
	partial_executions: Vec<PartialExecution>,
	cardinalities: Vec<MeasuredCardinality>,
}

/// A [`Job`] that records every report in memory
#[derive(Debug, Default)]
pub struct JobTracker {
	record: Mutex<JobRecord>,
}

impl JobTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn progress(&self) -> Vec<ProgressEvent> {
		self.record.lock().progress.clone()
	}

	pub fn partial_executions(&self) -> Vec<PartialExecution> {
		self.record.lock().partial_executions.clone()
	}

	pub fn measured_cardinalities(&self) -> Vec<MeasuredCardinality> {
		self.record.lock().cardinalities.clone()
	}

	/// Total number of atomic executions reported so far
	pub fn num_atomic_executions(&self) -> usize {
		self.record.lock().partial_executions.iter().map(|p| p.atomic_executions().len()).sum()
	}
}

impl Job for JobTracker {
	fn report_progress(&self, operator: &str, percent: u8) {
		self.record.lock().progress.push(ProgressEvent {
			operator: operator.to_string(),
			percent,
		});
	}

	fn add_partial_execution(&self, partial_execution: PartialExecution) {
		self.record.lock().partial_executions.push(partial_execution);
	}

	fn register_measured_cardinality(&self, operator: OperatorId, slot: usize, cardinality: usize) {
		self.record.lock().cardinalities.push(MeasuredCardinality {
			operator,
			slot,
			cardinality,
		});
	}
}
