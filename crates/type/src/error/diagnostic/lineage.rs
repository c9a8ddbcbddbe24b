// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::error::diagnostic::Diagnostic;

/// Adding the edge would close a cycle in the lineage graph
pub fn lineage_cycle(node: usize, predecessor: usize) -> Diagnostic {
	Diagnostic {
		code: "LINEAGE_001".to_string(),
		message: format!("Adding lineage node {} as predecessor of {} would create a cycle", predecessor, node),
		task: None,
		label: None,
		help: None,
		notes: vec!["Execution lineage must stay acyclic".to_string()],
		cause: None,
	}
}

pub fn unknown_node(node: usize) -> Diagnostic {
	Diagnostic {
		code: "LINEAGE_002".to_string(),
		message: format!("Unknown lineage node {}", node),
		task: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}
