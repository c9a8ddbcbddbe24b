// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Builder pattern for configuring the executor

use std::{sync::Arc, time::Duration};

use crate::{executor::Executor, job::Job};

pub const DEFAULT_SLOW_EXECUTION_THRESHOLD: Duration = Duration::from_millis(10);
pub const DEFAULT_OBJECT_FILE_BATCH_SIZE: usize = 64;

pub struct ExecutorBuilder {
	slow_execution_threshold: Option<Duration>,
	report_progress: Option<bool>,
	sample_seed: Option<u64>,
	object_file_batch_size: Option<usize>,
}

impl Default for ExecutorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ExecutorBuilder {
	/// Create a new ExecutorBuilder with default settings
	pub fn new() -> Self {
		Self {
			slow_execution_threshold: None,
			report_progress: None,
			sample_seed: None,
			object_file_batch_size: None,
		}
	}

	/// Executions without a partial execution that take longer than this
	/// are logged as suspiciously long. Defaults to 10ms.
	pub fn slow_execution_threshold(mut self, threshold: Duration) -> Self {
		self.slow_execution_threshold = Some(threshold);
		self
	}

	/// Whether progress is reported to the job. Defaults to true.
	pub fn report_progress(mut self, enabled: bool) -> Self {
		self.report_progress = Some(enabled);
		self
	}

	/// Seed used by sampling operators that do not carry their own seed.
	/// Unseeded samples draw from OS entropy.
	pub fn sample_seed(mut self, seed: u64) -> Self {
		self.sample_seed = Some(seed);
		self
	}

	/// Number of elements per record written by object file sinks
	pub fn object_file_batch_size(mut self, size: usize) -> Self {
		self.object_file_batch_size = Some(size);
		self
	}

	pub fn build_config(self) -> ExecutorConfig {
		ExecutorConfig {
			slow_execution_threshold: self.slow_execution_threshold.unwrap_or(DEFAULT_SLOW_EXECUTION_THRESHOLD),
			report_progress: self.report_progress.unwrap_or(true),
			sample_seed: self.sample_seed,
			object_file_batch_size: self.object_file_batch_size.unwrap_or(DEFAULT_OBJECT_FILE_BATCH_SIZE).max(1),
		}
	}

	pub fn build(self, job: Arc<dyn Job>) -> Executor {
		Executor::with_config(job, self.build_config())
	}
}

/// Configuration for the Executor
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
	pub slow_execution_threshold: Duration,
	pub report_progress: bool,
	pub sample_seed: Option<u64>,
	pub object_file_batch_size: usize,
}

impl Default for ExecutorConfig {
	fn default() -> Self {
		ExecutorBuilder::new().build_config()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = ExecutorConfig::default();
		assert_eq!(config.slow_execution_threshold, Duration::from_millis(10));
		assert!(config.report_progress);
		assert_eq!(config.sample_seed, None);
		assert_eq!(config.object_file_batch_size, 64);
	}

	#[test]
	fn test_builder_overrides() {
		let config = ExecutorBuilder::new()
			.slow_execution_threshold(Duration::from_secs(1))
			.report_progress(false)
			.sample_seed(42)
			.object_file_batch_size(0)
			.build_config();

		assert_eq!(config.slow_execution_threshold, Duration::from_secs(1));
		assert!(!config.report_progress);
		assert_eq!(config.sample_seed, Some(42));
		assert_eq!(config.object_file_batch_size, 1);
	}
}
