// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::Value;

/// The static element type carried by a channel or expected by a function
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
	/// Elements of any type
	Any,
	Undefined,
	Boolean,
	Int4,
	Int8,
	Float4,
	Float8,
	Utf8,
	Tuple,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int4 | Type::Int8 | Type::Float4 | Type::Float8)
	}

	/// Whether a value of type `other` is acceptable where `self` is expected
	pub fn accepts(&self, other: Type) -> bool {
		*self == Type::Any || *self == other
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Any => f.write_str("Any"),
			Type::Undefined => f.write_str("Undefined"),
			Type::Boolean => f.write_str("Boolean"),
			Type::Int4 => f.write_str("Int4"),
			Type::Int8 => f.write_str("Int8"),
			Type::Float4 => f.write_str("Float4"),
			Type::Float8 => f.write_str("Float8"),
			Type::Utf8 => f.write_str("Utf8"),
			Type::Tuple => f.write_str("Tuple"),
		}
	}
}

pub trait GetType {
	fn get_type(&self) -> Type;
}

impl GetType for Value {
	fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int4(_) => Type::Int4,
			Value::Int8(_) => Type::Int8,
			Value::Float4(_) => Type::Float4,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
			Value::Tuple(_) => Type::Tuple,
		}
	}
}

impl GetType for bool {
	fn get_type(&self) -> Type {
		Type::Boolean
	}
}

impl GetType for i32 {
	fn get_type(&self) -> Type {
		Type::Int4
	}
}

impl GetType for i64 {
	fn get_type(&self) -> Type {
		Type::Int8
	}
}

impl GetType for f32 {
	fn get_type(&self) -> Type {
		Type::Float4
	}
}

impl GetType for f64 {
	fn get_type(&self) -> Type {
		Type::Float8
	}
}

impl GetType for String {
	fn get_type(&self) -> Type {
		Type::Utf8
	}
}
