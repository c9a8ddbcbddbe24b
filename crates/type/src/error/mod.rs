// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::{Deref, DerefMut},
};

pub mod diagnostic;
mod r#macro;
pub mod render;

pub use diagnostic::{Diagnostic, IntoDiagnostic};
use render::DefaultRenderer;

#[derive(Debug, Clone, PartialEq)]
pub struct Error(pub Diagnostic);

impl Deref for Error {
	type Target = Diagnostic;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl DerefMut for Error {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let out = DefaultRenderer::render_string(&self.0);
		f.write_str(out.as_str())
	}
}

impl Error {
	pub fn diagnostic(self) -> Diagnostic {
		self.0
	}

	pub fn code(&self) -> &str {
		self.0.code.as_str()
	}
}

impl std::error::Error for Error {}

impl From<Diagnostic> for Error {
	fn from(diagnostic: Diagnostic) -> Self {
		Error(diagnostic)
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		crate::error!(diagnostic::io::io_error(err))
	}
}

impl From<postcard::Error> for Error {
	fn from(err: postcard::Error) -> Self {
		crate::error!(diagnostic::io::malformed_record(err.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use std::io;

	use super::*;

	#[test]
	fn test_io_error_converts() {
		let err: Error = io::Error::new(io::ErrorKind::NotFound, "missing.txt").into();
		assert_eq!(err.code(), "IO_001");
		assert!(err.message.contains("missing.txt"));
	}

	#[test]
	fn test_display_renders_code_and_message() {
		let err = Error(diagnostic::channel::reuse_violation("stream#3"));
		let rendered = err.to_string();
		assert!(rendered.starts_with("error[CHANNEL_001]"));
		assert!(rendered.contains("stream#3"));
	}
}
