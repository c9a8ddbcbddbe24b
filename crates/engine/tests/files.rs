// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fs, sync::Arc};

use tributary_core::{Channel, ChannelInstance, FileFormat, OperatorContext, Type, Value, function::FormatterDescriptor};
use tributary_engine::{
	ExecutionTask, ExecutorBuilder, JobTracker, Operators, TaskResult,
	operator::{
		CollectOperator, CollectionSource, ExecutionOperator, ObjectFileSink, ObjectFileSource, TextFileSink,
		TextFileSource, TsvFileSource,
	},
};
use tributary_testing::tempdir::temp_dir;

fn run(
	executor: &mut tributary_engine::Executor,
	operator: impl Into<Operators>,
	inputs: Vec<Option<ChannelInstance>>,
	outputs: Vec<Channel>,
) -> TaskResult {
	let task = ExecutionTask::new(operator, outputs);
	let ctx = OperatorContext::new(task.operator.id(), task.operator.name());
	executor.execute(&task, inputs, &ctx, false).unwrap()
}

fn drain(instance: &mut ChannelInstance) -> Vec<Value> {
	instance.provide_stream().unwrap().map(|v| v.unwrap()).collect()
}

#[test]
fn test_text_sink_formats_floats() {
	tributary_testing::tracing::init();
	temp_dir(|dir| {
		let path = dir.join("floats.txt");
		let mut executor = ExecutorBuilder::new().build(Arc::new(JobTracker::new()));

		let values = vec![Value::float4(1.123f32), Value::float4(-0.1f32), Value::float4(3.0f32)];
		let mut source = run(
			&mut executor,
			CollectionSource::new(1, values, Type::Float4),
			vec![],
			vec![Channel::stream(Type::Float4)],
		);

		let formatter =
			FormatterDescriptor::from_fn(|v| Ok(format!("{:.2}", v.as_f64().unwrap_or(f64::NAN))), Type::Float4);
		run(&mut executor, TextFileSink::new(2, &path, formatter), vec![source.outputs.remove(0)], vec![]);

		assert_eq!(fs::read_to_string(&path)?, "1.12\n-0.10\n3.00\n");

		let mut lines =
			run(&mut executor, TextFileSource::new(3, &path), vec![], vec![Channel::stream(Type::Utf8)]);
		let lines = drain(lines.outputs[0].as_mut().unwrap());
		assert_eq!(lines, vec![Value::utf8("1.12"), Value::utf8("-0.10"), Value::utf8("3.00")]);
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_object_file_round_trip_through_file_channel() {
	temp_dir(|dir| {
		let path = dir.join("objects.bin");
		let mut executor = ExecutorBuilder::new().object_file_batch_size(3).build(Arc::new(JobTracker::new()));

		let values: Vec<Value> = (0..10)
			.map(|i| Value::pair(Value::int4(i), Value::utf8(format!("item-{}", i))))
			.collect();
		let mut source = run(
			&mut executor,
			CollectionSource::new(1, values.clone(), Type::Tuple),
			vec![],
			vec![Channel::collection(Type::Tuple)],
		);

		let mut written = run(
			&mut executor,
			ObjectFileSink::new(2, &path, Type::Tuple),
			vec![source.outputs.remove(0)],
			vec![Channel::file(FileFormat::Object)],
		);
		let file = written.outputs.remove(0).unwrap();
		assert_eq!(file.single_path().unwrap(), path.as_path());

		let mut read = run(
			&mut executor,
			ObjectFileSource::from_channel(3, Type::Tuple),
			vec![Some(file)],
			vec![Channel::stream(Type::Tuple)],
		);
		let mut collected = run(
			&mut executor,
			CollectOperator::new(4, Type::Tuple),
			vec![read.outputs.remove(0)],
			vec![Channel::collection(Type::Tuple)],
		);
		let collected = collected.outputs.remove(0).unwrap();
		assert_eq!(collected.provide_collection().unwrap().as_slice(), values.as_slice());
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_tsv_source_from_directory() {
	temp_dir(|dir| {
		let data = dir.join("points");
		fs::create_dir(&data)?;
		fs::write(data.join("part-00000"), "1\t0.5\n2\t2.25\n")?;
		fs::write(data.join(".part-00000.crc"), "ignored")?;

		let mut executor = ExecutorBuilder::new().build(Arc::new(JobTracker::new()));
		let mut points = run(
			&mut executor,
			TsvFileSource::new(1, &data, vec![Type::Int4, Type::Float4]),
			vec![],
			vec![Channel::stream(Type::Tuple)],
		);
		assert_eq!(
			drain(points.outputs[0].as_mut().unwrap()),
			vec![
				Value::pair(Value::int4(1), Value::float4(0.5f32)),
				Value::pair(Value::int4(2), Value::float4(2.25f32)),
			]
		);
		Ok(())
	})
	.unwrap();
}

#[test]
fn test_ambiguous_directory_fails() {
	temp_dir(|dir| {
		let data = dir.join("parts");
		fs::create_dir(&data)?;
		fs::write(data.join("part-0"), "a\n")?;
		fs::write(data.join("part-1"), "b\n")?;

		let mut executor = ExecutorBuilder::new().build(Arc::new(JobTracker::new()));
		let task = ExecutionTask::new(TextFileSource::new(1, &data), vec![Channel::stream(Type::Utf8)]);
		let err = executor.execute(&task, vec![], &OperatorContext::new(1.into(), "text"), false).err().unwrap();
		assert_eq!(err.code, "EXECUTION_001");
		assert_eq!(err.root_cause().code, "IO_005");
		Ok(())
	})
	.unwrap();
}
