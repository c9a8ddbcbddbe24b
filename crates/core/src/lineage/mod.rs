// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Execution lineage: an arena DAG of operator executions and the channel
//! instances they feed. Lazy operators only add nodes and edges; an eager
//! consumer later forces the pending chain with
//! [`LineageGraph::collect_and_mark`], which attributes each atomic execution
//! exactly once.

use std::fmt::{Display, Formatter};

use tracing::trace;
use tributary_type::{
	Result, err,
	error::diagnostic::{internal::internal, lineage},
};

use crate::{channel::ChannelDescriptor, context::{CostEstimate, OperatorContext}};

pub mod partial;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineageNodeId(pub usize);

impl Display for LineageNodeId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.0, f)
	}
}

/// The cost record of one operator invocation
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicExecution {
	pub operator: String,
	pub cost: CostEstimate,
}

impl AtomicExecution {
	pub fn new(operator: impl Into<String>, cost: CostEstimate) -> Self {
		Self {
			operator: operator.into(),
			cost,
		}
	}

	pub fn from_context(ctx: &OperatorContext) -> Self {
		Self::new(ctx.name.clone(), ctx.cost)
	}
}

#[derive(Debug, Clone)]
pub enum LineageKind {
	Execution {
		operator: String,
		atomic_executions: Vec<AtomicExecution>,
	},
	Channel(ChannelDescriptor),
}

#[derive(Debug, Clone)]
pub struct LineageNode {
	pub kind: LineageKind,
	predecessors: Vec<LineageNodeId>,
	executed: bool,
}

impl LineageNode {
	pub fn predecessors(&self) -> &[LineageNodeId] {
		&self.predecessors
	}

	pub fn is_executed(&self) -> bool {
		self.executed
	}

	pub fn is_execution(&self) -> bool {
		matches!(self.kind, LineageKind::Execution { .. })
	}
}

#[derive(Debug, Default)]
pub struct LineageGraph {
	nodes: Vec<LineageNode>,
}

impl LineageGraph {
	pub fn new() -> Self {
		Self {
			nodes: Vec::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn add_execution(&mut self, operator: impl Into<String>) -> LineageNodeId {
		self.push(LineageKind::Execution {
			operator: operator.into(),
			atomic_executions: vec![],
		})
	}

	pub fn add_channel(&mut self, descriptor: ChannelDescriptor) -> LineageNodeId {
		self.push(LineageKind::Channel(descriptor))
	}

	fn push(&mut self, kind: LineageKind) -> LineageNodeId {
		let id = LineageNodeId(self.nodes.len());
		self.nodes.push(LineageNode {
			kind,
			predecessors: vec![],
			executed: false,
		});
		id
	}

	pub fn get(&self, id: LineageNodeId) -> Option<&LineageNode> {
		self.nodes.get(id.0)
	}

	fn node(&self, id: LineageNodeId) -> Result<&LineageNode> {
		match self.nodes.get(id.0) {
			Some(node) => Ok(node),
			None => err!(lineage::unknown_node(id.0)),
		}
	}

	fn node_mut(&mut self, id: LineageNodeId) -> Result<&mut LineageNode> {
		match self.nodes.get_mut(id.0) {
			Some(node) => Ok(node),
			None => err!(lineage::unknown_node(id.0)),
		}
	}

	pub fn add_atomic_execution(&mut self, id: LineageNodeId, execution: AtomicExecution) -> Result<()> {
		match &mut self.node_mut(id)?.kind {
			LineageKind::Execution {
				atomic_executions,
				..
			} => {
				atomic_executions.push(execution);
				Ok(())
			}
			LineageKind::Channel(_) => {
				err!(internal(format!("lineage node {} is a channel and cannot record executions", id)))
			}
		}
	}

	/// Records the operator context of the current invocation on an
	/// execution node
	pub fn add_atomic_execution_from(&mut self, id: LineageNodeId, ctx: &OperatorContext) -> Result<()> {
		self.add_atomic_execution(id, AtomicExecution::from_context(ctx))
	}

	/// Adds `predecessor` as an upstream dependency of `id`. Edges that
	/// would close a cycle are rejected.
	pub fn add_predecessor(&mut self, id: LineageNodeId, predecessor: LineageNodeId) -> Result<()> {
		self.node(predecessor)?;
		if self.node(id)?.predecessors.contains(&predecessor) {
			return Ok(());
		}
		if id == predecessor || self.reaches(predecessor, id) {
			return err!(lineage::lineage_cycle(id.0, predecessor.0));
		}
		self.node_mut(id)?.predecessors.push(predecessor);
		Ok(())
	}

	/// Whether `target` is `from` or one of its ancestors
	fn reaches(&self, from: LineageNodeId, target: LineageNodeId) -> bool {
		let mut visited = vec![false; self.nodes.len()];
		let mut stack = vec![from];
		while let Some(id) = stack.pop() {
			if id == target {
				return true;
			}
			if visited[id.0] {
				continue;
			}
			visited[id.0] = true;
			stack.extend(self.nodes[id.0].predecessors.iter().copied());
		}
		false
	}

	pub fn is_executed(&self, id: LineageNodeId) -> bool {
		self.get(id).map(|node| node.executed).unwrap_or(false)
	}

	/// Forces the lineage of `root`: collects every not yet executed node
	/// reachable through predecessors, marks it executed and returns the
	/// collected nodes in execution order. Executed nodes stop the walk.
	pub fn collect_and_mark(&mut self, root: LineageNodeId) -> Result<LineageCollection> {
		let mut collection = LineageCollection::empty();
		self.collect_into(root, &mut collection)?;
		Ok(collection)
	}

	pub fn collect_and_mark_all(
		&mut self,
		roots: impl IntoIterator<Item = LineageNodeId>,
	) -> Result<LineageCollection> {
		let mut collection = LineageCollection::empty();
		for root in roots {
			self.collect_into(root, &mut collection)?;
		}
		Ok(collection)
	}

	fn collect_into(&mut self, root: LineageNodeId, collection: &mut LineageCollection) -> Result<()> {
		let mut stack = vec![(root, false)];
		while let Some((id, expanded)) = stack.pop() {
			let node = self.node(id)?;
			if node.executed {
				continue;
			}

			if !expanded {
				stack.push((id, true));
				for predecessor in node.predecessors.iter().rev() {
					if !self.is_executed(*predecessor) {
						stack.push((*predecessor, false));
					}
				}
				continue;
			}

			let node = self.node_mut(id)?;
			node.executed = true;
			match &node.kind {
				LineageKind::Execution {
					atomic_executions,
					..
				} => {
					collection.executions.push(id);
					collection.atomic_executions.extend(atomic_executions.iter().cloned());
				}
				LineageKind::Channel(_) => collection.channels.push(id),
			}
		}

		trace!(
			root = %root,
			executions = collection.executions.len(),
			channels = collection.channels.len(),
			"collected lineage"
		);
		Ok(())
	}
}

/// The nodes resolved together by one force of the lineage graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineageCollection {
	executions: Vec<LineageNodeId>,
	channels: Vec<LineageNodeId>,
	atomic_executions: Vec<AtomicExecution>,
}

impl LineageCollection {
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.executions.is_empty() && self.channels.is_empty()
	}

	pub fn executions(&self) -> &[LineageNodeId] {
		&self.executions
	}

	pub fn channels(&self) -> &[LineageNodeId] {
		&self.channels
	}

	pub fn atomic_executions(&self) -> &[AtomicExecution] {
		&self.atomic_executions
	}

	pub fn merge(&mut self, other: LineageCollection) {
		self.executions.extend(other.executions);
		self.channels.extend(other.channels);
		self.atomic_executions.extend(other.atomic_executions);
	}

	pub fn into_atomic_executions(self) -> Vec<AtomicExecution> {
		self.atomic_executions
	}
}
