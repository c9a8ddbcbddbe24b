// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use tributary_core::{
	ChannelDescriptor, ChannelInstance, ChannelKind, InputSlot, LineageCollection, LineageNodeId, OperatorId,
	OutputSlot, Result, Value, function::FunctionDescriptor,
};

use crate::{
	context::{EvaluationContext, LocalExecutionContext},
	error::EngineError,
};

mod cartesian;
mod conversion;
mod count;
mod distinct;
mod filter;
mod flat_map;
mod group_by;
mod intersect;
pub mod iterate;
mod join;
mod map;
mod page_rank;
mod reduce;
pub mod sample;
pub mod sink;
pub mod source;
mod union;
mod zip_with_id;

pub use cartesian::CartesianOperator;
pub use conversion::{CollectOperator, StreamOperator};
pub use count::CountOperator;
pub use distinct::DistinctOperator;
pub use filter::FilterOperator;
pub use flat_map::FlatMapOperator;
pub use group_by::MaterializedGroupByOperator;
pub use intersect::IntersectOperator;
pub use iterate::{LoopOperator, RepeatOperator};
pub use join::JoinOperator;
pub use map::MapOperator;
pub use page_rank::PageRankOperator;
pub use reduce::{GlobalReduceOperator, ReduceByOperator};
pub use sample::{SampleMethod, SampleOperator};
pub use sink::{LocalCallbackSink, ObjectFileSink, TextFileSink};
pub use source::{CollectionSource, ObjectFileSource, TextFileSource, TsvFileSource};
pub use union::UnionAllOperator;
pub use zip_with_id::ZipWithIdOperator;

pub(crate) const STREAM: &[ChannelDescriptor] = &[ChannelDescriptor::STREAM];
pub(crate) const COLLECTION: &[ChannelDescriptor] = &[ChannelDescriptor::COLLECTION];
pub(crate) const STREAM_OR_COLLECTION: &[ChannelDescriptor] =
	&[ChannelDescriptor::STREAM, ChannelDescriptor::COLLECTION];
pub(crate) const COLLECTION_OR_STREAM: &[ChannelDescriptor] =
	&[ChannelDescriptor::COLLECTION, ChannelDescriptor::STREAM];

/// How an operator's work relates to its `evaluate` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
	/// Outputs wrap unevaluated sequences; cost is attributed when a
	/// consumer forces them
	Lazy,
	/// All work happens during the call; stream inputs are drained
	Eager,
	/// Some inputs are drained during the call, outputs stay lazy
	QuasiEager,
}

pub trait ExecutionOperator {
	fn id(&self) -> OperatorId;

	fn name(&self) -> &'static str;

	fn input_slots(&self) -> &[InputSlot];

	fn output_slots(&self) -> &[OutputSlot];

	/// Channels accepted on an input slot, in order of preference
	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor];

	/// Channels an output slot can produce, in order of preference
	fn supported_output_channels(&self, slot: usize) -> &'static [ChannelDescriptor];

	fn execution_mode(&self) -> ExecutionMode;

	fn evaluate(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection>;

	fn num_inputs(&self) -> usize {
		self.input_slots().len()
	}

	fn num_outputs(&self) -> usize {
		self.output_slots().len()
	}
}

pub enum Operators {
	CollectionSource(CollectionSource),
	TextFileSource(TextFileSource),
	TsvFileSource(TsvFileSource),
	ObjectFileSource(ObjectFileSource),
	Map(MapOperator),
	Filter(FilterOperator),
	FlatMap(FlatMapOperator),
	Distinct(DistinctOperator),
	Sample(SampleOperator),
	ZipWithId(ZipWithIdOperator),
	Count(CountOperator),
	GlobalReduce(GlobalReduceOperator),
	ReduceBy(ReduceByOperator),
	MaterializedGroupBy(MaterializedGroupByOperator),
	Join(JoinOperator),
	UnionAll(UnionAllOperator),
	Intersect(IntersectOperator),
	Cartesian(CartesianOperator),
	PageRank(PageRankOperator),
	Collect(CollectOperator),
	Stream(StreamOperator),
	TextFileSink(TextFileSink),
	ObjectFileSink(ObjectFileSink),
	LocalCallbackSink(LocalCallbackSink),
	Repeat(RepeatOperator),
	Loop(LoopOperator),
}

impl Operators {
	fn inner(&self) -> &dyn ExecutionOperator {
		match self {
			Operators::CollectionSource(op) => op,
			Operators::TextFileSource(op) => op,
			Operators::TsvFileSource(op) => op,
			Operators::ObjectFileSource(op) => op,
			Operators::Map(op) => op,
			Operators::Filter(op) => op,
			Operators::FlatMap(op) => op,
			Operators::Distinct(op) => op,
			Operators::Sample(op) => op,
			Operators::ZipWithId(op) => op,
			Operators::Count(op) => op,
			Operators::GlobalReduce(op) => op,
			Operators::ReduceBy(op) => op,
			Operators::MaterializedGroupBy(op) => op,
			Operators::Join(op) => op,
			Operators::UnionAll(op) => op,
			Operators::Intersect(op) => op,
			Operators::Cartesian(op) => op,
			Operators::PageRank(op) => op,
			Operators::Collect(op) => op,
			Operators::Stream(op) => op,
			Operators::TextFileSink(op) => op,
			Operators::ObjectFileSink(op) => op,
			Operators::LocalCallbackSink(op) => op,
			Operators::Repeat(op) => op,
			Operators::Loop(op) => op,
		}
	}
}

impl ExecutionOperator for Operators {
	fn id(&self) -> OperatorId {
		self.inner().id()
	}

	fn name(&self) -> &'static str {
		self.inner().name()
	}

	fn input_slots(&self) -> &[InputSlot] {
		self.inner().input_slots()
	}

	fn output_slots(&self) -> &[OutputSlot] {
		self.inner().output_slots()
	}

	fn supported_input_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		self.inner().supported_input_channels(slot)
	}

	fn supported_output_channels(&self, slot: usize) -> &'static [ChannelDescriptor] {
		self.inner().supported_output_channels(slot)
	}

	fn execution_mode(&self) -> ExecutionMode {
		self.inner().execution_mode()
	}

	fn evaluate(
		&self,
		inputs: &mut [Option<ChannelInstance>],
		outputs: &mut [Option<ChannelInstance>],
		ctx: &mut EvaluationContext<'_>,
	) -> Result<LineageCollection> {
		self.inner().evaluate(inputs, outputs, ctx)
	}
}

macro_rules! impl_from_operator {
	($($variant:ident => $operator:ty),* $(,)?) => {
		$(
			impl From<$operator> for Operators {
				fn from(op: $operator) -> Self {
					Operators::$variant(op)
				}
			}
		)*
	};
}

impl_from_operator! {
	CollectionSource => CollectionSource,
	TextFileSource => TextFileSource,
	TsvFileSource => TsvFileSource,
	ObjectFileSource => ObjectFileSource,
	Map => MapOperator,
	Filter => FilterOperator,
	FlatMap => FlatMapOperator,
	Distinct => DistinctOperator,
	Sample => SampleOperator,
	ZipWithId => ZipWithIdOperator,
	Count => CountOperator,
	GlobalReduce => GlobalReduceOperator,
	ReduceBy => ReduceByOperator,
	MaterializedGroupBy => MaterializedGroupByOperator,
	Join => JoinOperator,
	UnionAll => UnionAllOperator,
	Intersect => IntersectOperator,
	Cartesian => CartesianOperator,
	PageRank => PageRankOperator,
	Collect => CollectOperator,
	Stream => StreamOperator,
	TextFileSink => TextFileSink,
	ObjectFileSink => ObjectFileSink,
	LocalCallbackSink => LocalCallbackSink,
	Repeat => RepeatOperator,
	Loop => LoopOperator,
}

/// Capabilities of an input slot that may be declared broadcast. Broadcasts
/// are always read as collections.
pub(crate) fn data_or_broadcast(
	slots: &[InputSlot],
	slot: usize,
	data: &'static [ChannelDescriptor],
) -> &'static [ChannelDescriptor] {
	match slots.get(slot) {
		Some(s) if s.broadcast => COLLECTION,
		Some(_) => data,
		None => &[],
	}
}

pub(crate) fn ensure_arity(
	op: &(impl ExecutionOperator + ?Sized),
	inputs: &[Option<ChannelInstance>],
	outputs: &[Option<ChannelInstance>],
) -> Result<()> {
	if inputs.len() != op.num_inputs() {
		return Err(EngineError::ArityMismatch {
			operator: op.name().to_string(),
			direction: "input",
			expected: op.num_inputs(),
			actual: inputs.len(),
		}
		.into());
	}
	if outputs.len() != op.num_outputs() {
		return Err(EngineError::ArityMismatch {
			operator: op.name().to_string(),
			direction: "output",
			expected: op.num_outputs(),
			actual: outputs.len(),
		}
		.into());
	}
	Ok(())
}

pub(crate) fn input<'a>(
	operator: &str,
	inputs: &'a mut [Option<ChannelInstance>],
	slot: usize,
) -> Result<&'a mut ChannelInstance> {
	match inputs.get_mut(slot) {
		Some(Some(instance)) => Ok(instance),
		_ => Err(EngineError::MissingChannel {
			operator: operator.to_string(),
			direction: "input",
			slot,
		}
		.into()),
	}
}

pub(crate) fn output<'a>(
	operator: &str,
	outputs: &'a mut [Option<ChannelInstance>],
	slot: usize,
) -> Result<&'a mut ChannelInstance> {
	match outputs.get_mut(slot) {
		Some(Some(instance)) => Ok(instance),
		_ => Err(EngineError::MissingChannel {
			operator: operator.to_string(),
			direction: "output",
			slot,
		}
		.into()),
	}
}

/// Hands the data of `input` to `output` without materializing it. Streams
/// move, collections share their storage.
pub(crate) fn forward(input: &mut ChannelInstance, output: &mut ChannelInstance) -> Result<()> {
	match (input.kind(), output.kind()) {
		(ChannelKind::Collection, ChannelKind::Collection) => output.accept_collection(input.provide_collection()?),
		_ => output.accept_stream(input.provide_stream()?),
	}
}

/// All elements of an input, draining it if it is a stream
pub(crate) fn materialize(instance: &mut ChannelInstance) -> Result<Arc<Vec<Value>>> {
	if instance.kind() == ChannelKind::Collection {
		return instance.provide_collection();
	}
	let values = instance.provide_stream()?.collect::<Result<Vec<_>>>()?;
	Ok(Arc::new(values))
}

/// Compiles a function and runs its open hook against the operator's inputs
pub(crate) fn open_function<F: ?Sized>(
	operator: &str,
	descriptor: &FunctionDescriptor<F>,
	slots: &[InputSlot],
	inputs: &[Option<ChannelInstance>],
	ctx: &EvaluationContext<'_>,
) -> Result<Arc<F>> {
	let function = ctx.compiler.compile(descriptor);
	if descriptor.is_extended() {
		let execution_context = LocalExecutionContext::new(operator, slots, inputs, ctx.operator_context.iteration);
		ctx.compiler.open(descriptor, &execution_context)?;
	}
	Ok(function)
}

fn wire_execution(
	operator: &str,
	inputs: &[Option<ChannelInstance>],
	outputs: &[Option<ChannelInstance>],
	ctx: &mut EvaluationContext<'_>,
) -> Result<LineageNodeId> {
	let node = ctx.lineage.add_execution(operator);
	ctx.lineage.add_atomic_execution_from(node, ctx.operator_context)?;
	for instance in inputs.iter().flatten() {
		ctx.lineage.add_predecessor(node, instance.lineage())?;
	}
	for instance in outputs.iter().flatten() {
		ctx.lineage.add_predecessor(instance.lineage(), node)?;
	}
	Ok(node)
}

/// Chains the execution onto its outputs without collecting anything
pub(crate) fn model_lazy_execution(
	operator: &str,
	inputs: &[Option<ChannelInstance>],
	outputs: &[Option<ChannelInstance>],
	ctx: &mut EvaluationContext<'_>,
) -> Result<LineageCollection> {
	wire_execution(operator, inputs, outputs, ctx)?;
	Ok(LineageCollection::empty())
}

/// Records the execution and forces it together with all pending upstream
/// executions
pub(crate) fn model_eager_execution(
	operator: &str,
	inputs: &[Option<ChannelInstance>],
	outputs: &[Option<ChannelInstance>],
	ctx: &mut EvaluationContext<'_>,
) -> Result<LineageCollection> {
	let node = wire_execution(operator, inputs, outputs, ctx)?;
	ctx.lineage.collect_and_mark(node)
}

/// Forces the lineage of the inputs drained during the call while the
/// execution itself stays pending on its lazy outputs
pub(crate) fn model_quasi_eager_execution(
	operator: &str,
	inputs: &[Option<ChannelInstance>],
	outputs: &[Option<ChannelInstance>],
	drained: &[usize],
	ctx: &mut EvaluationContext<'_>,
) -> Result<LineageCollection> {
	wire_execution(operator, inputs, outputs, ctx)?;
	let roots: Vec<LineageNodeId> = drained
		.iter()
		.filter_map(|slot| inputs.get(*slot).and_then(Option::as_ref))
		.map(|instance| instance.lineage())
		.collect();
	ctx.lineage.collect_and_mark_all(roots)
}


#[cfg(test)]
mod tests {
	use tributary_core::{Channel, Type};

	use super::{harness::*, *};

	#[test]
	fn test_forward_moves_stream() {
		let mut h = Harness::new();
		let mut input = h.stream(ints(1..=3));
		let mut output = Channel::stream(Type::Any).create_instance(&mut h.lineage);

		forward(&mut input, &mut output).unwrap();
		assert!(input.is_consumed());
		assert_eq!(drain(&mut output), ints(1..=3));
	}

	#[test]
	fn test_forward_shares_collection() {
		let mut h = Harness::new();
		let mut input = h.collection(ints(1..=3));
		let mut output = Channel::collection(Type::Any).create_instance(&mut h.lineage);

		forward(&mut input, &mut output).unwrap();
		assert!(Arc::ptr_eq(&input.provide_collection().unwrap(), &output.provide_collection().unwrap()));
	}

	#[test]
	fn test_forward_refuses_to_materialize() {
		let mut h = Harness::new();
		let mut input = h.stream(ints(1..=3));
		let mut output = Channel::collection(Type::Any).create_instance(&mut h.lineage);

		assert_eq!(forward(&mut input, &mut output).unwrap_err().code, "CHANNEL_002");
	}

	#[test]
	fn test_arity_mismatch() {
		let mut h = Harness::new();
		let op = CountOperator::new(1);
		let mut inputs = vec![];
		let mut outputs = vec![h.output(ChannelDescriptor::COLLECTION)];
		let err = h.evaluate(&op, &mut inputs, &mut outputs).unwrap_err();
		assert_eq!(err.code, "PLAN_001");
	}

	#[test]
	fn test_operators_dispatch() {
		let op: Operators = CountOperator::new(9).into();
		assert_eq!(op.id(), OperatorId(9));
		assert_eq!(op.name(), "Count");
		assert_eq!(op.execution_mode(), ExecutionMode::Eager);
		assert_eq!(op.num_inputs(), 1);
		assert_eq!(op.supported_output_channels(0), COLLECTION);
		assert!(op.supported_input_channels(1).is_empty());
	}
}
