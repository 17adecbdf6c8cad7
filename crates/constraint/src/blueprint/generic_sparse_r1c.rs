// Copyright 2025 Irreducible Inc.
//! Sparse rank-1 constraint with every coefficient explicit.
//!
//! Enforces `qL⋅xa + qR⋅xb + qO⋅xc + qM⋅xa⋅xb + qC = 0`.
//!
//! # Calldata
//!
//! Fixed, 8 words: `[xa, xb, xc, qL, qR, qO, qM, qC]`.

use tessera_core::{
	CalldataError, CalldataSize, Field, SparseR1c, calldata::fixed_words,
};

use super::solve::{level_and_claim, solve_sparse_r1c};
use crate::{
	blueprint::calldata_error,
	error::SolveError,
	instruction::Instruction,
	solver::Solver,
	tree::{InstructionTree, Level},
};

/// The blueprint, see the module documentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericSparseR1c;

impl GenericSparseR1c {
	/// The calldata size of every instruction.
	pub const CALLDATA_SIZE: CalldataSize = CalldataSize::Fixed(8);

	/// Appends the calldata of `c`.
	pub fn compress(&self, c: &SparseR1c, to: &mut Vec<u32>) {
		to.extend_from_slice(&[c.xa, c.xb, c.xc, c.ql, c.qr, c.qo, c.qm, c.qc]);
	}

	/// Recovers the payload of an instruction.
	pub fn decompress(&self, inst: &Instruction<'_>) -> Result<SparseR1c, CalldataError> {
		let [xa, xb, xc, ql, qr, qo, qm, qc] = fixed_words(inst.calldata)?;
		Ok(SparseR1c {
			xa,
			xb,
			xc,
			ql,
			qr,
			qo,
			qm,
			qc,
		})
	}

	/// See [`super::Blueprint::update_instruction_tree`].
	pub fn update_instruction_tree(
		&self,
		inst: &Instruction<'_>,
		tree: &mut InstructionTree,
	) -> Result<Level, CalldataError> {
		let c = self.decompress(inst)?;
		Ok(level_and_claim(tree, [c.xa, c.xb, c.xc]))
	}

	/// See [`super::Blueprint::solve`].
	pub fn solve<F: Field, S: Solver<F>>(
		&self,
		solver: &mut S,
		inst: &Instruction<'_>,
	) -> Result<(), SolveError> {
		let c = self.decompress(inst).map_err(calldata_error(inst))?;
		solve_sparse_r1c(solver, inst, &c)
	}
}
