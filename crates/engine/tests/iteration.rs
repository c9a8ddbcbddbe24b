// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use tributary_core::{
	Channel, ChannelInstance, OperatorContext, Type, Value,
	function::{ConvergenceDescriptor, TransformationDescriptor},
};
use tributary_engine::{
	ExecutionTask, Executor, JobTracker, LoopState, Operators, TaskResult,
	operator::{
		CollectOperator, CollectionSource, CountOperator, ExecutionOperator, LoopOperator, MapOperator, RepeatOperator,
		iterate::{r#loop, repeat},
	},
};

fn run(
	executor: &mut Executor,
	operator: impl Into<Operators>,
	inputs: Vec<Option<ChannelInstance>>,
	outputs: Vec<Channel>,
	iteration: usize,
) -> tributary_engine::Result<TaskResult> {
	let task = ExecutionTask::new(operator, outputs);
	let ctx = OperatorContext::new(task.operator.id(), task.operator.name()).with_iteration(iteration);
	executor.execute(&task, inputs, &ctx, false)
}

fn plus(amount: i32) -> TransformationDescriptor {
	TransformationDescriptor::from_fn(
		move |v| Ok(Value::Int4(v.as_i64().unwrap_or(0) as i32 + amount)),
		Type::Int4,
		Type::Int4,
	)
}

fn ints(values: impl IntoIterator<Item = i32>) -> Vec<Value> {
	values.into_iter().map(Value::Int4).collect()
}

fn drain(instance: &mut ChannelInstance) -> Vec<Value> {
	instance.provide_stream().unwrap().map(|v| v.unwrap()).collect()
}

/// Body of both loops: adds one to every element and materializes the result
fn step(executor: &mut Executor, data: ChannelInstance, iteration: usize) -> ChannelInstance {
	let mut mapped =
		run(executor, MapOperator::new(10, plus(1)), vec![Some(data)], vec![Channel::stream(Type::Int4)], iteration)
			.unwrap();
	let mut collected = run(
		executor,
		CollectOperator::new(11, Type::Int4),
		vec![mapped.outputs.remove(0)],
		vec![Channel::collection(Type::Int4)],
		iteration,
	)
	.unwrap();
	collected.outputs.remove(0).unwrap()
}

#[test]
fn test_repeat_through_executor() {
	tributary_testing::tracing::init();
	let job = Arc::new(JobTracker::new());
	let mut executor = Executor::new(job.clone());
	let repeat_outputs = || vec![Channel::stream(Type::Int4), Channel::stream(Type::Int4)];

	let mut initial = run(
		&mut executor,
		CollectionSource::new(1, ints([1, 2, 3]), Type::Int4),
		vec![],
		vec![Channel::collection(Type::Int4)],
		0,
	)
	.unwrap();

	let repeat = || RepeatOperator::new(2, 3, Type::Int4);
	let mut result = run(&mut executor, repeat(), vec![initial.outputs.remove(0), None], repeat_outputs(), 0).unwrap();
	assert!(result.outputs[repeat::FINAL_OUTPUT].is_none());
	assert_eq!(executor.iteration_state(2.into()).state, LoopState::Running);

	let mut iteration = 0;
	let mut last = loop {
		let data = result.outputs[repeat::ITERATION_OUTPUT].take().unwrap();
		let body = step(&mut executor, data, iteration);
		iteration += 1;

		result = run(&mut executor, repeat(), vec![None, Some(body)], repeat_outputs(), iteration).unwrap();
		if let Some(last) = result.outputs[repeat::FINAL_OUTPUT].take() {
			assert!(result.outputs[repeat::ITERATION_OUTPUT].is_none());
			break last;
		}
	};

	assert_eq!(iteration, 3);
	assert_eq!(drain(&mut last), ints([4, 5, 6]));
	let state = executor.iteration_state(2.into());
	assert_eq!(state.state, LoopState::Finished);
	assert_eq!(state.iteration, 3);
	assert!(job.partial_executions().iter().any(|partial| partial.operators().contains(&"Repeat")));
}

#[test]
fn test_loop_until_converged() {
	let mut executor = Executor::new(Arc::new(JobTracker::new()));
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	let criterion = ConvergenceDescriptor::from_fn(
		move |values| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(values.iter().any(|v| v.as_i64().unwrap_or(0) >= 5))
		},
		Type::Int4,
	);
	let operator = || LoopOperator::new(3, criterion.clone(), Type::Int4, 10);
	let loop_outputs = || {
		vec![Channel::collection(Type::Int4), Channel::collection(Type::Int4), Channel::collection(Type::Int4)]
	};

	let data = run(
		&mut executor,
		CollectionSource::new(1, ints([1, 2]), Type::Int4),
		vec![],
		vec![Channel::collection(Type::Int4)],
		0,
	)
	.unwrap()
	.outputs
	.remove(0)
	.unwrap();
	let convergence = data.share();

	let mut result =
		run(&mut executor, operator(), vec![Some(data), convergence, None, None], loop_outputs(), 0).unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 0);
	assert!(result.outputs[r#loop::FINAL_OUTPUT].is_none());

	let mut iteration = 0;
	let last = loop {
		let data = result.outputs[r#loop::ITERATION_OUTPUT].take().unwrap();
		let body = step(&mut executor, data, iteration);
		let convergence = body.share();
		iteration += 1;

		result = run(&mut executor, operator(), vec![None, None, Some(body), convergence], loop_outputs(), iteration)
			.unwrap();
		if let Some(last) = result.outputs[r#loop::FINAL_OUTPUT].take() {
			assert!(result.outputs[r#loop::ITERATION_OUTPUT].is_none());
			assert!(result.outputs[r#loop::ITERATION_CONVERGENCE_OUTPUT].is_none());
			break last;
		}
		assert!(result.outputs[r#loop::ITERATION_CONVERGENCE_OUTPUT].is_some());
	};

	assert_eq!(iteration, 3);
	assert_eq!(calls.load(Ordering::SeqCst), 3);
	assert_eq!(last.provide_collection().unwrap().as_slice(), ints([4, 5]).as_slice());
	assert_eq!(executor.iteration_state(3.into()).state, LoopState::Finished);

	let again = last.share();
	let err = run(&mut executor, operator(), vec![None, None, again, last.share()], loop_outputs(), iteration)
		.err()
		.unwrap();
	assert_eq!(err.code, "EXECUTION_001");
	assert_eq!(err.root_cause().code, "ITERATION_001");
}

fn operators(result: &TaskResult) -> Vec<&str> {
	result.partial_execution.as_ref().map(|partial| partial.operators()).unwrap_or_default()
}

#[test]
fn test_repeat_leaves_forwarded_lineage_pending() {
	let mut executor = Executor::new(Arc::new(JobTracker::new()));

	let mut source = run(
		&mut executor,
		CollectionSource::new(1, ints([1, 2, 3]), Type::Int4),
		vec![],
		vec![Channel::stream(Type::Int4)],
		0,
	)
	.unwrap();
	let input = source.outputs.remove(0);
	let mut mapped =
		run(&mut executor, MapOperator::new(2, plus(1)), vec![input], vec![Channel::stream(Type::Int4)], 0).unwrap();
	assert!(mapped.partial_execution.is_none());

	let mut repeated = run(
		&mut executor,
		RepeatOperator::new(3, 0, Type::Int4),
		vec![mapped.outputs.remove(0), None],
		vec![Channel::stream(Type::Int4), Channel::stream(Type::Int4)],
		0,
	)
	.unwrap();
	assert_eq!(operators(&repeated), vec!["Repeat"]);

	let counted = run(
		&mut executor,
		CountOperator::new(4),
		vec![repeated.outputs[repeat::FINAL_OUTPUT].take()],
		vec![Channel::collection(Type::Int8)],
		0,
	)
	.unwrap();
	assert_eq!(operators(&counted), vec!["Map", "Count"]);
	assert_eq!(counted.outputs[0].as_ref().unwrap().provide_collection().unwrap().as_slice(), &[Value::int8(3i64)]);
}

#[test]
fn test_loop_forces_only_the_convergence_input() {
	let mut executor = Executor::new(Arc::new(JobTracker::new()));
	let criterion = ConvergenceDescriptor::from_fn(|values| Ok(!values.is_empty()), Type::Int4);
	let operator = || LoopOperator::new(5, criterion.clone(), Type::Int4, 1);
	let loop_outputs =
		|| vec![Channel::stream(Type::Int4), Channel::stream(Type::Int4), Channel::collection(Type::Int4)];

	let mut source = run(
		&mut executor,
		CollectionSource::new(1, ints([1, 2, 3]), Type::Int4),
		vec![],
		vec![Channel::collection(Type::Int4)],
		0,
	)
	.unwrap();
	let data = source.outputs.remove(0).unwrap();
	let convergence = data.share();
	let mut mapped =
		run(&mut executor, MapOperator::new(2, plus(1)), vec![Some(data)], vec![Channel::stream(Type::Int4)], 0)
			.unwrap();

	let mut first =
		run(&mut executor, operator(), vec![mapped.outputs.remove(0), convergence, None, None], loop_outputs(), 0)
			.unwrap();
	assert_eq!(operators(&first), vec!["Loop"]);

	let mut last = run(
		&mut executor,
		operator(),
		vec![
			None,
			None,
			first.outputs[r#loop::ITERATION_OUTPUT].take(),
			first.outputs[r#loop::ITERATION_CONVERGENCE_OUTPUT].take(),
		],
		loop_outputs(),
		1,
	)
	.unwrap();
	assert_eq!(operators(&last), vec!["Loop"]);

	let counted = run(
		&mut executor,
		CountOperator::new(6),
		vec![last.outputs[r#loop::FINAL_OUTPUT].take()],
		vec![Channel::collection(Type::Int8)],
		1,
	)
	.unwrap();
	assert_eq!(operators(&counted), vec!["Map", "Count"]);
}
