// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod callback;
mod object;
mod text;

pub use callback::LocalCallbackSink;
pub use object::ObjectFileSink;
pub use text::TextFileSink;
