// Copyright 2025 Irreducible Inc.
//! Rank-1 constraint over arbitrary linear expressions.
//!
//! Enforces `L ⋅ R = O`.
//!
//! # Calldata
//!
//! The size depends on the number of terms, so the range is length prefixed. The three term
//! counts come first so the expressions can follow without their own counts:
//!
//! ```text
//! [len, n_l, n_r, n_o, terms(L)..., terms(R)..., terms(O)...]
//! ```
//!
//! # Solving
//!
//! At most one wire may be unsolved and the constraint must be linear in it.

use tessera_core::{
	CalldataError, CalldataReader, CalldataSize, Compressible, Field, R1c,
	calldata::with_length_prefix,
};

use super::solve::{level_and_claim, solve_r1c};
use crate::{
	blueprint::calldata_error,
	error::SolveError,
	instruction::Instruction,
	solver::Solver,
	tree::{InstructionTree, Level},
};

/// The blueprint, see the module documentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericR1c;

impl GenericR1c {
	/// The calldata size of every instruction.
	pub const CALLDATA_SIZE: CalldataSize = CalldataSize::Unknown;

	/// Appends the calldata of `c`.
	pub fn compress(&self, c: &R1c, to: &mut Vec<u32>) {
		with_length_prefix(to, |to| {
			to.push(c.l.len() as u32);
			to.push(c.r.len() as u32);
			to.push(c.o.len() as u32);
			for term in c.l.iter().chain(c.r.iter()).chain(c.o.iter()) {
				term.compress(to);
			}
		});
	}

	/// Recovers the payload of an instruction.
	pub fn decompress(&self, inst: &Instruction<'_>) -> Result<R1c, CalldataError> {
		let mut reader = CalldataReader::with_length_prefix(inst.calldata)?;
		let n_l = reader.read_len()?;
		let n_r = reader.read_len()?;
		let n_o = reader.read_len()?;
		let c = R1c {
			l: reader.read_terms(n_l)?,
			r: reader.read_terms(n_r)?,
			o: reader.read_terms(n_o)?,
		};
		reader.finish()?;
		Ok(c)
	}

	/// See [`super::Blueprint::update_instruction_tree`].
	pub fn update_instruction_tree(
		&self,
		inst: &Instruction<'_>,
		tree: &mut InstructionTree,
	) -> Result<Level, CalldataError> {
		let c = self.decompress(inst)?;
		Ok(level_and_claim(tree, c.wires()))
	}

	/// See [`super::Blueprint::solve`].
	pub fn solve<F: Field, S: Solver<F>>(
		&self,
		solver: &mut S,
		inst: &Instruction<'_>,
	) -> Result<(), SolveError> {
		let c = self.decompress(inst).map_err(calldata_error(inst))?;
		solve_r1c(solver, inst, &c.l, &c.r, &c.o)
	}
}
