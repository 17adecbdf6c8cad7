// Copyright 2025 Irreducible Inc.
//! Weighted addition.
//!
//! Enforces `qL⋅xa + qR⋅xb = xc`.
//!
//! # Calldata
//!
//! Fixed, 5 words: `[xa, xb, xc, qL, qR]`. Decompresses to a [`SparseR1c`] with `qO = -1`,
//! `qM = 0` and `qC = 0`.

use tessera_core::{
	CalldataError, CalldataSize, Field, SparseR1c,
	calldata::fixed_words,
	consts::{COEFF_ID_MINUS_ONE, COEFF_ID_ZERO},
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
pub struct SparseR1cAdd;

impl SparseR1cAdd {
	/// The calldata size of every instruction.
	pub const CALLDATA_SIZE: CalldataSize = CalldataSize::Fixed(5);

	/// Appends the calldata of `c`.
	///
	/// # Panics
	/// Panics if `c` has a quadratic or constant part, or if `qO` is not `-1`.
	pub fn compress(&self, c: &SparseR1c, to: &mut Vec<u32>) {
		assert!(
			c.qm == COEFF_ID_ZERO && c.qc == COEFF_ID_ZERO && c.qo == COEFF_ID_MINUS_ONE,
			"sparse_r1c_add only encodes qL⋅xa + qR⋅xb = xc, got {c:?}"
		);
		to.extend_from_slice(&[c.xa, c.xb, c.xc, c.ql, c.qr]);
	}

	/// Recovers the payload of an instruction.
	pub fn decompress(&self, inst: &Instruction<'_>) -> Result<SparseR1c, CalldataError> {
		let [xa, xb, xc, ql, qr] = fixed_words(inst.calldata)?;
		Ok(SparseR1c {
			xa,
			xb,
			xc,
			ql,
			qr,
			qo: COEFF_ID_MINUS_ONE,
			qm: COEFF_ID_ZERO,
			qc: COEFF_ID_ZERO,
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
