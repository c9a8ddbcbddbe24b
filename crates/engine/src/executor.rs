// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
	time::{Duration, Instant},
};

use tracing::{Span, debug, info, instrument, warn};
use tributary_core::{
	Channel, ChannelInstance, ChannelKind, LineageGraph, OperatorContext, OperatorId, PartialExecution, Result,
	function::FunctionCompiler,
};

use crate::{
	config::ExecutorConfig,
	context::EvaluationContext,
	error::EngineError,
	job::Job,
	operator::{ExecutionMode, ExecutionOperator, Operators},
	state::{IterationState, IterationStates},
};

/// An operator together with the channels chosen for its outputs
pub struct ExecutionTask {
	pub operator: Operators,
	pub output_channels: Vec<Channel>,
}

impl ExecutionTask {
	pub fn new(operator: impl Into<Operators>, output_channels: Vec<Channel>) -> Self {
		Self {
			operator: operator.into(),
			output_channels,
		}
	}
}

impl Display for ExecutionTask {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}[{}]", self.operator.name(), self.operator.id())
	}
}

#[derive(Debug)]
pub struct TaskResult {
	/// One entry per output slot; slots an iterative operator left inactive
	/// are `None`
	pub outputs: Vec<Option<ChannelInstance>>,
	pub partial_execution: Option<PartialExecution>,
}

/// Executes operators on behalf of one job. Lineage and iteration state
/// live as long as the executor.
pub struct Executor {
	config: ExecutorConfig,
	job: Arc<dyn Job>,
	lineage: LineageGraph,
	compiler: FunctionCompiler,
	iteration_states: IterationStates,
}

impl Executor {
	pub fn new(job: Arc<dyn Job>) -> Self {
		Self::with_config(job, ExecutorConfig::default())
	}

	pub fn with_config(job: Arc<dyn Job>, config: ExecutorConfig) -> Self {
		Self {
			config,
			job,
			lineage: LineageGraph::new(),
			compiler: FunctionCompiler::new(),
			iteration_states: IterationStates::new(),
		}
	}

	pub fn config(&self) -> &ExecutorConfig {
		&self.config
	}

	pub fn lineage(&self) -> &LineageGraph {
		&self.lineage
	}

	pub fn iteration_state(&self, operator: OperatorId) -> IterationState {
		self.iteration_states.get(operator)
	}

	/// Binds a channel to a new instance tracked by this executor's lineage
	pub fn create_instance(&mut self, channel: &Channel) -> ChannelInstance {
		channel.create_instance(&mut self.lineage)
	}

	#[instrument(name = "engine::executor::execute", level = "debug", skip_all, fields(
		task = %task,
		force_eager = force_eager,
		duration_us = tracing::field::Empty,
		atomic_executions = tracing::field::Empty
	))]
	pub fn execute(
		&mut self,
		task: &ExecutionTask,
		mut inputs: Vec<Option<ChannelInstance>>,
		operator_context: &OperatorContext,
		force_eager: bool,
	) -> Result<TaskResult> {
		let operator = &task.operator;
		self.validate(task, &inputs)?;

		let mut outputs: Vec<Option<ChannelInstance>> =
			task.output_channels.iter().map(|channel| Some(channel.create_instance(&mut self.lineage))).collect();

		self.report_progress(operator.name(), 0);
		let start = Instant::now();
		let result = {
			let mut ctx = EvaluationContext {
				lineage: &mut self.lineage,
				compiler: &self.compiler,
				iteration_states: &mut self.iteration_states,
				operator_context,
				config: &self.config,
			};
			operator.evaluate(&mut inputs, &mut outputs, &mut ctx)
		};
		let duration = start.elapsed();
		let collected = result.map_err(|cause| EngineError::OperatorExecutionFailure {
			task: task.to_string(),
			cause: Box::new(cause),
		})?;
		self.report_progress(operator.name(), 50);
		Span::current().record("duration_us", duration.as_micros() as u64);

		if operator.execution_mode() == ExecutionMode::Eager {
			check_drained(operator, &inputs)?;
		}

		let partial_execution = PartialExecution::new(collected, duration);
		match &partial_execution {
			Some(partial) => {
				Span::current().record("atomic_executions", partial.atomic_executions().len());
				self.job.add_partial_execution(partial.clone());
			}
			None if duration > self.config.slow_execution_threshold => {
				warn!(task = %task, duration = ?duration, "execution took suspiciously long without executing anything");
			}
			None => {}
		}

		if force_eager && partial_execution.is_none() {
			self.warn_not_eager(task, &outputs);
		}

		for (slot, output) in outputs.iter().enumerate() {
			if let Some(size) = output.as_ref().and_then(ChannelInstance::size) {
				self.job.register_measured_cardinality(operator.id(), slot, size);
			}
		}
		self.report_progress(operator.name(), 100);

		Ok(TaskResult {
			outputs,
			partial_execution,
		})
	}

	/// Forces the pending lineage of `instance`, reporting what it executed
	#[instrument(name = "engine::executor::force", level = "debug", skip_all, fields(instance = %instance.name()))]
	pub fn force(&mut self, instance: &ChannelInstance) -> Result<Option<PartialExecution>> {
		let collected = self.lineage.collect_and_mark(instance.lineage())?;
		let partial_execution = PartialExecution::new(collected, Duration::ZERO);
		if let Some(partial) = &partial_execution {
			debug!(operators = ?partial.operators(), "forced lineage");
			self.job.add_partial_execution(partial.clone());
		}
		Ok(partial_execution)
	}

	fn validate(&self, task: &ExecutionTask, inputs: &[Option<ChannelInstance>]) -> Result<()> {
		let operator = &task.operator;
		if inputs.len() != operator.num_inputs() {
			return Err(EngineError::ArityMismatch {
				operator: operator.name().to_string(),
				direction: "input",
				expected: operator.num_inputs(),
				actual: inputs.len(),
			}
			.into());
		}
		if task.output_channels.len() != operator.num_outputs() {
			return Err(EngineError::ArityMismatch {
				operator: operator.name().to_string(),
				direction: "output",
				expected: operator.num_outputs(),
				actual: task.output_channels.len(),
			}
			.into());
		}

		for (slot, instance) in inputs.iter().enumerate() {
			let Some(instance) = instance else {
				continue;
			};
			if !instance.descriptor().is_supported_by(operator.supported_input_channels(slot)) {
				return Err(EngineError::UnsupportedChannel {
					operator: operator.name().to_string(),
					direction: "input",
					slot,
					descriptor: instance.descriptor(),
				}
				.into());
			}
		}

		for (slot, channel) in task.output_channels.iter().enumerate() {
			if !channel.descriptor.is_supported_by(operator.supported_output_channels(slot)) {
				return Err(EngineError::UnsupportedChannel {
					operator: operator.name().to_string(),
					direction: "output",
					slot,
					descriptor: channel.descriptor,
				}
				.into());
			}
		}
		Ok(())
	}

	fn report_progress(&self, operator: &str, percent: u8) {
		if self.config.report_progress {
			self.job.report_progress(operator, percent);
		}
	}

	fn warn_not_eager(&self, task: &ExecutionTask, outputs: &[Option<ChannelInstance>]) {
		let lazy: Vec<String> = outputs
			.iter()
			.flatten()
			.filter(|output| !output.descriptor().is_reusable())
			.map(ChannelInstance::name)
			.collect();

		if lazy.is_empty() {
			info!(task = %task, "eager execution requested but nothing was executed");
		} else {
			warn!(task = %task, outputs = ?lazy, "eager execution requested but non-reusable outputs stay lazy");
		}
	}
}

/// Eager operators must have consumed every stream they were given
fn check_drained(operator: &Operators, inputs: &[Option<ChannelInstance>]) -> Result<()> {
	for (slot, input) in inputs.iter().enumerate() {
		if let Some(input) = input
			&& input.kind() == ChannelKind::Stream
			&& !input.is_consumed()
		{
			return Err(EngineError::UndrainedInput {
				operator: operator.name().to_string(),
				slot,
			}
			.into());
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use tributary_core::{ChannelDescriptor, Type, Value, function::TransformationDescriptor};

	use super::*;
	use crate::{
		config::ExecutorBuilder,
		job::JobTracker,
		operator::{CollectionSource, CountOperator, MapOperator},
	};

	fn executor() -> (Executor, Arc<JobTracker>) {
		let job = Arc::new(JobTracker::new());
		(Executor::new(job.clone()), job)
	}

	#[test]
	fn test_task_display() {
		let task = ExecutionTask::new(CountOperator::new(4), vec![Channel::collection(Type::Int8)]);
		assert_eq!(task.to_string(), "Count[op#4]");
	}

	#[test]
	fn test_output_arity_mismatch() {
		let (mut executor, _) = executor();
		let task = ExecutionTask::new(CountOperator::new(1), vec![]);
		let input = executor.create_instance(&Channel::collection(Type::Int4));
		let ctx = OperatorContext::new(1.into(), "count");
		let err = executor.execute(&task, vec![Some(input)], &ctx, false).unwrap_err();
		assert_eq!(err.code, "PLAN_001");
	}

	#[test]
	fn test_unsupported_output_channel() {
		let (mut executor, _) = executor();
		let task = ExecutionTask::new(CountOperator::new(1), vec![Channel::stream(Type::Int8)]);
		let mut input = executor.create_instance(&Channel::collection(Type::Int4));
		input.accept_collection(vec![Value::int4(1)]).unwrap();

		let ctx = OperatorContext::new(1.into(), "count");
		let err = executor.execute(&task, vec![Some(input)], &ctx, false).unwrap_err();
		assert_eq!(err.code, "CHANNEL_002");
	}

	#[test]
	fn test_evaluate_failure_wraps_cause() {
		let (mut executor, _) = executor();
		let task = ExecutionTask::new(CountOperator::new(1), vec![Channel::collection(Type::Int8)]);
		let input = executor.create_instance(&Channel::stream(Type::Int4));

		let ctx = OperatorContext::new(1.into(), "count");
		let err = executor.execute(&task, vec![Some(input)], &ctx, false).unwrap_err();
		assert_eq!(err.code, "EXECUTION_001");
		assert_eq!(err.task.as_deref(), Some("Count[op#1]"));
		assert_eq!(err.root_cause().code, "CHANNEL_003");
	}

	#[test]
	fn test_progress_midpoint_follows_evaluate() {
		let (mut executor, job) = executor();
		let task = ExecutionTask::new(CountOperator::new(1), vec![Channel::collection(Type::Int8)]);
		let input = executor.create_instance(&Channel::stream(Type::Int4));
		let ctx = OperatorContext::new(1.into(), "count");
		executor.execute(&task, vec![Some(input)], &ctx, false).unwrap_err();

		let percents: Vec<u8> = job.progress().iter().map(|event| event.percent).collect();
		assert_eq!(percents, vec![0]);
	}

	#[test]
	fn test_lazy_then_eager_partial_execution() {
		let (mut executor, job) = executor();
		let source = ExecutionTask::new(
			CollectionSource::new(1, (1..=4).map(Value::Int4).collect::<Vec<_>>(), Type::Int4),
			vec![Channel::stream(Type::Int4)],
		);
		let source_ctx = OperatorContext::new(1.into(), "source");
		let mut produced = executor.execute(&source, vec![], &source_ctx, false).unwrap();
		assert!(produced.partial_execution.is_some());

		let map = ExecutionTask::new(
			MapOperator::new(2, TransformationDescriptor::from_fn(Ok, Type::Int4, Type::Int4)),
			vec![Channel::stream(Type::Int4)],
		);
		let map_ctx = OperatorContext::new(2.into(), "map");
		let mut mapped = executor.execute(&map, vec![produced.outputs.remove(0)], &map_ctx, true).unwrap();
		assert!(mapped.partial_execution.is_none());

		let count = ExecutionTask::new(CountOperator::new(3), vec![Channel::collection(Type::Int8)]);
		let count_ctx = OperatorContext::new(3.into(), "count");
		let counted = executor.execute(&count, vec![mapped.outputs.remove(0)], &count_ctx, false).unwrap();

		let partial = counted.partial_execution.unwrap();
		assert_eq!(partial.operators(), vec!["map", "count"]);
		assert_eq!(job.partial_executions().len(), 2);
		assert_eq!(job.num_atomic_executions(), 3);

		let cardinalities = job.measured_cardinalities();
		assert_eq!(cardinalities.last().map(|c| (c.operator, c.cardinality)), Some((OperatorId(3), 1)));
	}

	#[test]
	fn test_progress_reporting_can_be_disabled() {
		let job = Arc::new(JobTracker::new());
		let mut executor = ExecutorBuilder::new()
			.report_progress(false)
			.slow_execution_threshold(Duration::from_secs(60))
			.build(job.clone());

		let source = ExecutionTask::new(
			CollectionSource::new(1, vec![Value::int4(1)], Type::Int4),
			vec![Channel::collection(Type::Int4)],
		);
		executor.execute(&source, vec![], &OperatorContext::new(1.into(), "source"), false).unwrap();
		assert!(job.progress().is_empty());
		assert_eq!(executor.config().slow_execution_threshold, Duration::from_secs(60));
	}

	#[test]
	fn test_force_lazy_output() {
		let (mut executor, job) = executor();
		let mut input = executor.create_instance(&Channel::collection(Type::Int4));
		input.accept_collection(vec![Value::int4(1)]).unwrap();

		let map = ExecutionTask::new(
			MapOperator::new(2, TransformationDescriptor::from_fn(Ok, Type::Int4, Type::Int4)),
			vec![Channel::stream(Type::Int4)],
		);
		let ctx = OperatorContext::new(2.into(), "map");
		let result = executor.execute(&map, vec![Some(input)], &ctx, false).unwrap();
		let output = result.outputs[0].as_ref().unwrap();

		let forced = executor.force(output).unwrap().unwrap();
		assert_eq!(forced.operators(), vec!["map"]);
		assert!(executor.force(output).unwrap().is_none());
		assert_eq!(job.partial_executions().len(), 1);
		assert!(executor.lineage().is_executed(output.lineage()));
		assert_eq!(ChannelDescriptor::STREAM, output.descriptor());
	}
}
