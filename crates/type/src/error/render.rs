// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use super::Diagnostic;

pub trait DiagnosticRenderer {
	fn render(&self, diagnostic: &Diagnostic) -> String;
}

pub struct DefaultRenderer;

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		DefaultRenderer.render(diagnostic)
	}

	fn render_nested(&self, output: &mut String, d: &Diagnostic, depth: usize) {
		let indent = "  ".repeat(depth);

		if depth == 0 {
			let _ = writeln!(output, "error[{}]: {}", d.code, d.message);
		} else {
			let _ = writeln!(output, "{}caused by [{}]: {}", indent, d.code, d.message);
		}

		if let Some(task) = &d.task {
			let _ = writeln!(output, "{}  --> {}", indent, task);
		}

		if let Some(label) = &d.label {
			let _ = writeln!(output, "{}   = {}", indent, label);
		}

		if let Some(help) = &d.help {
			let _ = writeln!(output, "\n{}help: {}", indent, help);
		}

		for note in &d.notes {
			let _ = writeln!(output, "\n{}note: {}", indent, note);
		}

		if let Some(cause) = &d.cause {
			let _ = writeln!(output);
			self.render_nested(output, cause, depth + 1);
		}
	}
}

impl DiagnosticRenderer for DefaultRenderer {
	fn render(&self, diagnostic: &Diagnostic) -> String {
		let mut output = String::new();
		self.render_nested(&mut output, diagnostic, 0);
		output
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::diagnostic::channel;

	#[test]
	fn test_render_includes_cause_chain() {
		let mut outer = channel::unsupported_channel("Map", "input", 0, "File(Text)");
		outer.cause = Some(Box::new(channel::reuse_violation("stream#7")));

		let rendered = DefaultRenderer::render_string(&outer);
		assert!(rendered.contains("error[CHANNEL_002]"));
		assert!(rendered.contains("caused by [CHANNEL_001]"));
		assert!(rendered.contains("stream#7"));
	}
}
