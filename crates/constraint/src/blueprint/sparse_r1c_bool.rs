// Copyright 2025 Irreducible Inc.
//! Boolean-style assertion on a single wire.
//!
//! Enforces `qL⋅xa + qM⋅xa⋅xa = 0`. With `qL = -1` and `qM = 1` this is `xa ∈ {0, 1}`.
//!
//! # Calldata
//!
//! Fixed, 3 words: `[xa, qL, qM]`.
//!
//! # Solving
//!
//! Never solves anything, the constraint is quadratic in its only wire. The runtime checks it
//! once `xa` has been solved by a lower level, so `xa` must already be produced when the
//! assertion is appended.

use tessera_core::{
	CalldataError, CalldataSize, SparseR1c,
	calldata::fixed_words,
	consts::COEFF_ID_ZERO,
};

use crate::{
	instruction::Instruction,
	tree::{InstructionTree, Level},
};

/// The blueprint, see the module documentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SparseR1cBool;

impl SparseR1cBool {
	/// The calldata size of every instruction.
	pub const CALLDATA_SIZE: CalldataSize = CalldataSize::Fixed(3);

	/// Appends the calldata of `c`.
	///
	/// # Panics
	/// Panics if `c` reads more than one wire or has a `qR`, `qO` or `qC` part.
	pub fn compress(&self, c: &SparseR1c, to: &mut Vec<u32>) {
		assert!(
			c.xb == c.xa
				&& c.xc == c.xa
				&& c.qr == COEFF_ID_ZERO
				&& c.qo == COEFF_ID_ZERO
				&& c.qc == COEFF_ID_ZERO,
			"sparse_r1c_bool only encodes qL⋅xa + qM⋅xa⋅xa = 0, got {c:?}"
		);
		to.extend_from_slice(&[c.xa, c.ql, c.qm]);
	}

	/// Recovers the payload of an instruction.
	pub fn decompress(&self, inst: &Instruction<'_>) -> Result<SparseR1c, CalldataError> {
		let [xa, ql, qm] = fixed_words(inst.calldata)?;
		Ok(SparseR1c {
			xa,
			xb: xa,
			xc: xa,
			ql,
			qr: COEFF_ID_ZERO,
			qo: COEFF_ID_ZERO,
			qm,
			qc: COEFF_ID_ZERO,
		})
	}

	/// Places the assertion one level above `xa`. Claims nothing, an unproduced `xa` is an
	/// error.
	pub fn update_instruction_tree(
		&self,
		inst: &Instruction<'_>,
		tree: &mut InstructionTree,
	) -> Result<Level, CalldataError> {
		let [xa, _, _] = fixed_words::<3>(inst.calldata)?;
		if !tree.has_wire(xa) {
			return Err(CalldataError::UnproducedWire { wire: xa });
		}
		Ok(tree.level_above([xa]))
	}
}
