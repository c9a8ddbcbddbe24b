// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! User supplied functions. The engine never inspects a function body; it
//! only invokes the callable and, for functions carrying an open hook, hands
//! it an [`ExecutionContext`] once per evaluation before the first element.

use std::{
	fmt,
	fmt::{Debug, Formatter},
	sync::Arc,
};

use tributary_type::{Result, Type, Value};

mod compiler;
mod execution;

pub use compiler::FunctionCompiler;
pub use execution::ExecutionContext;

pub type OpenHook = Arc<dyn Fn(&dyn ExecutionContext) -> Result<()> + Send + Sync>;

pub type TransformationFn = dyn Fn(Value) -> Result<Value> + Send + Sync;
pub type PredicateFn = dyn Fn(&Value) -> Result<bool> + Send + Sync;
pub type FlatMapFn = dyn Fn(Value) -> Result<Vec<Value>> + Send + Sync;
pub type KeyFn = dyn Fn(&Value) -> Result<Value> + Send + Sync;
pub type ReduceFn = dyn Fn(Value, Value) -> Result<Value> + Send + Sync;
pub type ConvergenceFn = dyn Fn(&[Value]) -> Result<bool> + Send + Sync;
pub type FormatterFn = dyn Fn(&Value) -> Result<String> + Send + Sync;
pub type CallbackFn = dyn Fn(&Value) -> Result<()> + Send + Sync;

pub type TransformationDescriptor = FunctionDescriptor<TransformationFn>;
pub type PredicateDescriptor = FunctionDescriptor<PredicateFn>;
pub type FlatMapDescriptor = FunctionDescriptor<FlatMapFn>;
pub type KeyDescriptor = FunctionDescriptor<KeyFn>;
pub type ReduceDescriptor = FunctionDescriptor<ReduceFn>;
pub type ConvergenceDescriptor = FunctionDescriptor<ConvergenceFn>;
pub type FormatterDescriptor = FunctionDescriptor<FormatterFn>;
pub type CallbackDescriptor = FunctionDescriptor<CallbackFn>;

/// An opaque callable with its static input and output types.
pub struct FunctionDescriptor<F: ?Sized> {
	function: Arc<F>,
	open: Option<OpenHook>,
	input_type: Type,
	output_type: Type,
}

impl<F: ?Sized> FunctionDescriptor<F> {
	pub fn new(function: Arc<F>, input_type: Type, output_type: Type) -> Self {
		Self {
			function,
			open: None,
			input_type,
			output_type,
		}
	}

	/// Attaches a hook receiving the execution context before the first
	/// invocation of each evaluation
	pub fn with_open(
		mut self,
		open: impl Fn(&dyn ExecutionContext) -> Result<()> + Send + Sync + 'static,
	) -> Self {
		self.open = Some(Arc::new(open));
		self
	}

	pub fn function(&self) -> &Arc<F> {
		&self.function
	}

	pub fn open_hook(&self) -> Option<&OpenHook> {
		self.open.as_ref()
	}

	/// Whether the function needs access to the execution context
	pub fn is_extended(&self) -> bool {
		self.open.is_some()
	}

	pub fn input_type(&self) -> Type {
		self.input_type
	}

	pub fn output_type(&self) -> Type {
		self.output_type
	}
}

impl<F: ?Sized> Clone for FunctionDescriptor<F> {
	fn clone(&self) -> Self {
		Self {
			function: Arc::clone(&self.function),
			open: self.open.clone(),
			input_type: self.input_type,
			output_type: self.output_type,
		}
	}
}

impl<F: ?Sized> Debug for FunctionDescriptor<F> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("FunctionDescriptor")
			.field("input_type", &self.input_type)
			.field("output_type", &self.output_type)
			.field("extended", &self.is_extended())
			.finish()
	}
}

impl FunctionDescriptor<TransformationFn> {
	pub fn from_fn(
		function: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
		input_type: Type,
		output_type: Type,
	) -> Self {
		Self::new(Arc::new(function), input_type, output_type)
	}
}

impl FunctionDescriptor<PredicateFn> {
	pub fn from_fn(function: impl Fn(&Value) -> Result<bool> + Send + Sync + 'static, input_type: Type) -> Self {
		Self::new(Arc::new(function), input_type, Type::Boolean)
	}
}

impl FunctionDescriptor<FlatMapFn> {
	pub fn from_fn(
		function: impl Fn(Value) -> Result<Vec<Value>> + Send + Sync + 'static,
		input_type: Type,
		output_type: Type,
	) -> Self {
		Self::new(Arc::new(function), input_type, output_type)
	}
}

impl FunctionDescriptor<KeyFn> {
	pub fn from_fn(
		function: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
		input_type: Type,
		key_type: Type,
	) -> Self {
		Self::new(Arc::new(function), input_type, key_type)
	}
}

impl FunctionDescriptor<ReduceFn> {
	pub fn from_fn(function: impl Fn(Value, Value) -> Result<Value> + Send + Sync + 'static, element_type: Type) -> Self {
		Self::new(Arc::new(function), element_type, element_type)
	}
}

impl FunctionDescriptor<ConvergenceFn> {
	pub fn from_fn(function: impl Fn(&[Value]) -> Result<bool> + Send + Sync + 'static, input_type: Type) -> Self {
		Self::new(Arc::new(function), input_type, Type::Boolean)
	}
}

impl FunctionDescriptor<FormatterFn> {
	pub fn from_fn(function: impl Fn(&Value) -> Result<String> + Send + Sync + 'static, input_type: Type) -> Self {
		Self::new(Arc::new(function), input_type, Type::Utf8)
	}
}

impl FunctionDescriptor<CallbackFn> {
	pub fn from_fn(function: impl Fn(&Value) -> Result<()> + Send + Sync + 'static, input_type: Type) -> Self {
		Self::new(Arc::new(function), input_type, Type::Undefined)
	}
}
