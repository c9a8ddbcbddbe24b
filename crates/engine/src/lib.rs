// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod io;
pub mod job;
pub mod operator;
pub mod state;

pub use config::{ExecutorBuilder, ExecutorConfig};
pub use error::EngineError;
pub use executor::{ExecutionTask, Executor, TaskResult};
pub use job::{Job, JobTracker};
pub use operator::{ExecutionMode, ExecutionOperator, Operators};
pub use state::{IterationState, IterationStates, LoopState};
pub use tributary_core::{Error, Result};
