// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod error;
pub mod value;

pub use error::{Diagnostic, Error, IntoDiagnostic};
pub use value::{GetType, OrderedF32, OrderedF64, Type, Value};

pub type Result<T> = std::result::Result<T, Error>;
