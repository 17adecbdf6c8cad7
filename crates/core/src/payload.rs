// Copyright 2025 Irreducible Inc.
//! Constraint and hint payloads that blueprints compress into calldata.
//!
//! The payloads are plain data. Their algebraic meaning is only interpreted by the blueprints
//! that solve them.

use std::ops::Range;

use crate::{calldata::Compressible, term::LinearExpression};

/// A rank-1 constraint `L * R = O` over linear expressions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct R1c {
	/// Left operand.
	pub l: LinearExpression,
	/// Right operand.
	pub r: LinearExpression,
	/// Output.
	pub o: LinearExpression,
}

impl R1c {
	/// Iterates over every wire referenced by the constraint, `L` first, then `R`, then `O`.
	pub fn wires(&self) -> impl Iterator<Item = u32> + '_ {
		self.l.wires().chain(self.r.wires()).chain(self.o.wires())
	}
}

/// A sparse rank-1 constraint over at most three wires:
///
/// `qL⋅xa + qR⋅xb + qO⋅xc + qM⋅(xa⋅xb) + qC == 0`
///
/// The `q*` fields are coefficient ids, not values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SparseR1c {
	/// First wire.
	pub xa: u32,
	/// Second wire.
	pub xb: u32,
	/// Third wire.
	pub xc: u32,
	/// Coefficient of `xa`.
	pub ql: u32,
	/// Coefficient of `xb`.
	pub qr: u32,
	/// Coefficient of `xc`.
	pub qo: u32,
	/// Coefficient of `xa⋅xb`.
	pub qm: u32,
	/// Constant term.
	pub qc: u32,
}

/// A half-open range of consecutive wire ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WireRange {
	/// First wire of the range.
	pub start: u32,
	/// One past the last wire of the range.
	pub end: u32,
}

impl WireRange {
	/// Creates a new range.
	pub fn new(start: u32, end: u32) -> Self {
		assert!(start <= end, "wire range {start}..{end} is reversed");
		Self { start, end }
	}

	/// The number of wires in the range.
	pub fn len(&self) -> usize {
		(self.end - self.start) as usize
	}

	/// Returns `true` if the range holds no wires.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Iterates over the wire ids of the range.
	pub fn iter(&self) -> Range<u32> {
		self.start..self.end
	}
}

impl Compressible for WireRange {
	fn compress(&self, to: &mut Vec<u32>) {
		to.push(self.start);
		to.push(self.end);
	}
}

/// Maps an external hint function onto the wires it reads and writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HintMapping {
	/// Id of the hint function in the hint registry of the solver.
	pub hint_id: u32,
	/// The inputs passed to the hint function, each evaluated before the call.
	pub inputs: Vec<LinearExpression>,
	/// The wires the hint function writes.
	pub outputs: WireRange,
}
