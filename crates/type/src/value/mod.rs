// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

mod ordered_f32;
mod ordered_f64;
mod r#type;

pub use ordered_f32::OrderedF32;
pub use ordered_f64::OrderedF64;
pub use r#type::{GetType, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedFloatError;

impl Display for OrderedFloatError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str("NaN is not a valid ordered float")
	}
}

impl std::error::Error for OrderedFloatError {}

/// A single dataflow element, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// A 4-byte floating point
	Float4(OrderedF32),
	/// An 8-byte floating point
	Float8(OrderedF64),
	/// A UTF-8 encoded text
	Utf8(String),
	/// An ordered group of values, used for pairs produced by joins and
	/// groupings
	Tuple(Vec<Value>),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn float4(v: impl Into<f32>) -> Self {
		OrderedF32::try_from(v.into()).map(Value::Float4).unwrap_or(Value::Undefined)
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Float8).unwrap_or(Value::Undefined)
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn tuple(values: impl IntoIterator<Item = Value>) -> Self {
		Value::Tuple(values.into_iter().collect())
	}

	pub fn pair(left: Value, right: Value) -> Self {
		Value::Tuple(vec![left, right])
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Integer view of the value, widening `Int4`
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int4(v) => Some(*v as i64),
			Value::Int8(v) => Some(*v),
			_ => None,
		}
	}

	/// Floating point view of any numeric value
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int4(v) => Some(*v as f64),
			Value::Int8(v) => Some(*v as f64),
			Value::Float4(v) => Some(v.value() as f64),
			Value::Float8(v) => Some(v.value()),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Utf8(v) => Some(v.as_str()),
			_ => None,
		}
	}

	pub fn as_tuple(&self) -> Option<&[Value]> {
		match self {
			Value::Tuple(values) => Some(values.as_slice()),
			_ => None,
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Value::Undefined => 0,
			Value::Boolean(_) => 1,
			Value::Int4(_) => 2,
			Value::Int8(_) => 3,
			Value::Float4(_) => 4,
			Value::Float8(_) => 5,
			Value::Utf8(_) => 6,
			Value::Tuple(_) => 7,
		}
	}
}

impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

// Values of different types order by their type, undefined first.
impl Ord for Value {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Value::Undefined, Value::Undefined) => Ordering::Equal,
			(Value::Boolean(l), Value::Boolean(r)) => l.cmp(r),
			(Value::Int4(l), Value::Int4(r)) => l.cmp(r),
			(Value::Int8(l), Value::Int8(r)) => l.cmp(r),
			(Value::Float4(l), Value::Float4(r)) => l.cmp(r),
			(Value::Float8(l), Value::Float8(r)) => l.cmp(r),
			(Value::Utf8(l), Value::Utf8(r)) => l.cmp(r),
			(Value::Tuple(l), Value::Tuple(r)) => l.cmp(r),
			(l, r) => l.rank().cmp(&r.rank()),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Value::Boolean(true) => f.write_str("true"),
			Value::Boolean(false) => f.write_str("false"),
			Value::Int4(value) => Display::fmt(value, f),
			Value::Int8(value) => Display::fmt(value, f),
			Value::Float4(value) => Display::fmt(value, f),
			Value::Float8(value) => Display::fmt(value, f),
			Value::Utf8(value) => Display::fmt(value, f),
			Value::Tuple(values) => {
				f.write_str("(")?;
				for (idx, value) in values.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					Display::fmt(value, f)?;
				}
				f.write_str(")")
			}
			Value::Undefined => f.write_str("undefined"),
		}
	}
}

impl Value {
	pub fn get_type(&self) -> Type {
		GetType::get_type(self)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int4(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<f32> for Value {
	fn from(v: f32) -> Self {
		Value::float4(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_nan_becomes_undefined() {
		assert_eq!(Value::float4(f32::NAN), Value::Undefined);
		assert_eq!(Value::float8(f64::NAN), Value::Undefined);
	}

	#[test]
	fn test_cross_type_ordering() {
		let mut values = vec![Value::utf8("a"), Value::int4(3), Value::Undefined, Value::bool(true)];
		values.sort();
		assert_eq!(values, vec![Value::Undefined, Value::bool(true), Value::int4(3), Value::utf8("a")]);
	}

	#[test]
	fn test_display_tuple() {
		let value = Value::pair(Value::int4(1), Value::tuple(vec![Value::utf8("x"), Value::float8(2.5)]));
		assert_eq!(value.to_string(), "(1, (x, 2.5))");
	}

	#[test]
	fn test_numeric_views() {
		assert_eq!(Value::int4(7).as_i64(), Some(7));
		assert_eq!(Value::float4(0.5f32).as_f64(), Some(0.5));
		assert_eq!(Value::utf8("7").as_i64(), None);
	}

	#[test]
	fn test_get_type() {
		assert_eq!(Value::int8(1i64).get_type(), Type::Int8);
		assert_eq!(Value::pair(Value::Undefined, Value::Undefined).get_type(), Type::Tuple);
	}
}
