// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{Display, Formatter},
	ops::Add,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperatorId(pub u64);

impl Display for OperatorId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "op#{}", self.0)
	}
}

impl From<u64> for OperatorId {
	fn from(id: u64) -> Self {
		OperatorId(id)
	}
}

/// Estimated number of elements on a channel, as an interval with a
/// confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardinalityEstimate {
	pub lower: u64,
	pub upper: u64,
	pub correctness: f64,
}

impl CardinalityEstimate {
	pub fn new(lower: u64, upper: u64, correctness: f64) -> Self {
		Self {
			lower,
			upper,
			correctness,
		}
	}

	pub fn exact(cardinality: u64) -> Self {
		Self::new(cardinality, cardinality, 1.0)
	}

	pub fn is_exact(&self) -> bool {
		self.lower == self.upper && self.correctness >= 1.0
	}

	pub fn average(&self) -> u64 {
		self.lower / 2 + self.upper / 2 + (self.lower % 2 + self.upper % 2) / 2
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
	pub lower: f64,
	pub upper: f64,
	pub correctness: f64,
}

impl CostEstimate {
	pub fn new(lower: f64, upper: f64, correctness: f64) -> Self {
		Self {
			lower,
			upper,
			correctness,
		}
	}

	pub fn exact(cost: f64) -> Self {
		Self::new(cost, cost, 1.0)
	}

	pub fn zero() -> Self {
		Self::exact(0.0)
	}
}

impl Default for CostEstimate {
	fn default() -> Self {
		Self::zero()
	}
}

impl Add for CostEstimate {
	type Output = CostEstimate;

	fn add(self, rhs: Self) -> Self::Output {
		CostEstimate {
			lower: self.lower + rhs.lower,
			upper: self.upper + rhs.upper,
			correctness: self.correctness.min(rhs.correctness),
		}
	}
}

/// Planner-supplied facts about one scheduled operator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorContext {
	pub operator: OperatorId,
	pub name: String,
	pub input_cardinalities: Vec<Option<CardinalityEstimate>>,
	pub output_cardinalities: Vec<Option<CardinalityEstimate>>,
	/// Iteration epoch this invocation belongs to, 0 outside of loops
	pub iteration: usize,
	pub cost: CostEstimate,
}

impl OperatorContext {
	pub fn new(operator: OperatorId, name: impl Into<String>) -> Self {
		Self {
			operator,
			name: name.into(),
			input_cardinalities: vec![],
			output_cardinalities: vec![],
			iteration: 0,
			cost: CostEstimate::zero(),
		}
	}

	pub fn with_input_cardinality(mut self, slot: usize, estimate: CardinalityEstimate) -> Self {
		if self.input_cardinalities.len() <= slot {
			self.input_cardinalities.resize(slot + 1, None);
		}
		self.input_cardinalities[slot] = Some(estimate);
		self
	}

	pub fn with_output_cardinality(mut self, slot: usize, estimate: CardinalityEstimate) -> Self {
		if self.output_cardinalities.len() <= slot {
			self.output_cardinalities.resize(slot + 1, None);
		}
		self.output_cardinalities[slot] = Some(estimate);
		self
	}

	pub fn with_iteration(mut self, iteration: usize) -> Self {
		self.iteration = iteration;
		self
	}

	pub fn with_cost(mut self, cost: CostEstimate) -> Self {
		self.cost = cost;
		self
	}

	pub fn input_cardinality(&self, slot: usize) -> Option<CardinalityEstimate> {
		self.input_cardinalities.get(slot).copied().flatten()
	}

	pub fn output_cardinality(&self, slot: usize) -> Option<CardinalityEstimate> {
		self.output_cardinalities.get(slot).copied().flatten()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_cost_add() {
		let total = CostEstimate::new(1.0, 2.0, 0.9) + CostEstimate::new(3.0, 5.0, 0.5);
		assert_eq!(total, CostEstimate::new(4.0, 7.0, 0.5));
	}

	#[test]
	fn test_sparse_cardinalities() {
		let ctx = OperatorContext::new(OperatorId(1), "Join").with_input_cardinality(1, CardinalityEstimate::exact(10));
		assert_eq!(ctx.input_cardinality(0), None);
		assert_eq!(ctx.input_cardinality(1), Some(CardinalityEstimate::exact(10)));
		assert_eq!(ctx.input_cardinality(5), None);
	}

	#[test]
	fn test_average() {
		assert_eq!(CardinalityEstimate::new(3, 5, 0.8).average(), 4);
		assert_eq!(CardinalityEstimate::new(u64::MAX, u64::MAX, 1.0).average(), u64::MAX);
	}
}
