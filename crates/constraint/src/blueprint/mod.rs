// Copyright 2025 Irreducible Inc.
//! Blueprints: the compression schemes of instructions.
//!
//! A blueprint knows how to compress one class of constraints or hints into calldata, how many
//! constraints and output wires such an instruction contributes, how to place it on a level of
//! the [`InstructionTree`] and, when it can, how to solve it.
//!
//! The set of blueprints is closed. Capabilities are queried with [`Blueprint::is_solvable`],
//! [`Blueprint::is_stateful`] and [`Blueprint::payload_kind`]; calling an operation a blueprint
//! does not support is a programming error and panics.

use cranelift_entity::entity_impl;
use tessera_core::{
	CalldataError, CalldataReader, CalldataSize, Field, HintMapping, LinearExpression, R1c,
	SparseR1c,
};

use crate::{
	error::SolveError,
	hints::HintRegistry,
	instruction::Instruction,
	solver::Solver,
	tree::{InstructionTree, Level},
};

pub mod generic_hint;
pub mod generic_r1c;
pub mod generic_sparse_r1c;
pub mod lookup;
pub mod solve;
pub mod sparse_r1c_add;
pub mod sparse_r1c_bool;
pub mod sparse_r1c_mul;

pub use generic_hint::GenericHint;
pub use generic_r1c::GenericR1c;
pub use generic_sparse_r1c::GenericSparseR1c;
pub use lookup::Lookup;
pub use sparse_r1c_add::SparseR1cAdd;
pub use sparse_r1c_bool::SparseR1cBool;
pub use sparse_r1c_mul::SparseR1cMul;

/// Identifies a blueprint within the registry of a system.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct BlueprintId(u32);
entity_impl!(BlueprintId);

/// The kind of payload a blueprint compresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
	/// [`R1c`].
	R1c,
	/// [`SparseR1c`].
	SparseR1c,
	/// [`HintMapping`].
	Hint,
	/// Entries and queries of a table lookup.
	Lookup,
}

/// A compression scheme for one class of instructions.
#[derive(Clone, Debug)]
pub enum Blueprint<F: Field> {
	/// Rank-1 constraint over arbitrary linear expressions.
	GenericR1c(GenericR1c),
	/// Sparse rank-1 constraint with all coefficients explicit.
	GenericSparseR1c(GenericSparseR1c),
	/// `qM⋅xa⋅xb = xc`.
	SparseR1cMul(SparseR1cMul),
	/// `qL⋅xa + qR⋅xb = xc`.
	SparseR1cAdd(SparseR1cAdd),
	/// `qL⋅xa + qM⋅xa⋅xa = 0`, checked but never solved.
	SparseR1cBool(SparseR1cBool),
	/// An external hint function.
	GenericHint(GenericHint),
	/// Table lookup, keeps the evaluated table between the decoding steps of one solve.
	Lookup(Lookup<F>),
}

impl<F: Field> Blueprint<F> {
	/// A [`GenericR1c`] blueprint.
	pub fn generic_r1c() -> Self {
		Blueprint::GenericR1c(GenericR1c)
	}

	/// A [`GenericSparseR1c`] blueprint.
	pub fn generic_sparse_r1c() -> Self {
		Blueprint::GenericSparseR1c(GenericSparseR1c)
	}

	/// A [`SparseR1cMul`] blueprint.
	pub fn sparse_r1c_mul() -> Self {
		Blueprint::SparseR1cMul(SparseR1cMul)
	}

	/// A [`SparseR1cAdd`] blueprint.
	pub fn sparse_r1c_add() -> Self {
		Blueprint::SparseR1cAdd(SparseR1cAdd)
	}

	/// A [`SparseR1cBool`] blueprint.
	pub fn sparse_r1c_bool() -> Self {
		Blueprint::SparseR1cBool(SparseR1cBool)
	}

	/// A [`GenericHint`] blueprint.
	pub fn generic_hint() -> Self {
		Blueprint::GenericHint(GenericHint)
	}

	/// A [`Lookup`] blueprint.
	pub fn lookup() -> Self {
		Blueprint::Lookup(Lookup::new())
	}

	/// A short human readable name.
	pub fn name(&self) -> &'static str {
		match self {
			Blueprint::GenericR1c(_) => "generic_r1c",
			Blueprint::GenericSparseR1c(_) => "generic_sparse_r1c",
			Blueprint::SparseR1cMul(_) => "sparse_r1c_mul",
			Blueprint::SparseR1cAdd(_) => "sparse_r1c_add",
			Blueprint::SparseR1cBool(_) => "sparse_r1c_bool",
			Blueprint::GenericHint(_) => "generic_hint",
			Blueprint::Lookup(_) => "lookup",
		}
	}

	/// The number of calldata words of an instruction, or [`CalldataSize::Unknown`] when the
	/// first word of the range holds it.
	pub fn calldata_size(&self) -> CalldataSize {
		match self {
			Blueprint::GenericR1c(_) => GenericR1c::CALLDATA_SIZE,
			Blueprint::GenericSparseR1c(_) => GenericSparseR1c::CALLDATA_SIZE,
			Blueprint::SparseR1cMul(_) => SparseR1cMul::CALLDATA_SIZE,
			Blueprint::SparseR1cAdd(_) => SparseR1cAdd::CALLDATA_SIZE,
			Blueprint::SparseR1cBool(_) => SparseR1cBool::CALLDATA_SIZE,
			Blueprint::GenericHint(_) => GenericHint::CALLDATA_SIZE,
			Blueprint::Lookup(_) => lookup::CALLDATA_SIZE,
		}
	}

	/// The number of constraints one instruction contributes. Never depends on calldata.
	pub fn nb_constraints(&self) -> usize {
		match self {
			Blueprint::GenericR1c(_)
			| Blueprint::GenericSparseR1c(_)
			| Blueprint::SparseR1cMul(_)
			| Blueprint::SparseR1cAdd(_)
			| Blueprint::SparseR1cBool(_) => 1,
			Blueprint::GenericHint(_) | Blueprint::Lookup(_) => 0,
		}
	}

	/// The number of new wires the instruction allocates.
	pub fn nb_outputs(&self, inst: &Instruction<'_>) -> Result<usize, CalldataError> {
		match self {
			Blueprint::GenericR1c(_)
			| Blueprint::GenericSparseR1c(_)
			| Blueprint::SparseR1cMul(_)
			| Blueprint::SparseR1cAdd(_)
			| Blueprint::SparseR1cBool(_) => Ok(0),
			Blueprint::GenericHint(b) => b.nb_outputs(inst),
			Blueprint::Lookup(b) => b.nb_outputs(inst),
		}
	}

	/// Places a freshly appended instruction on its level and assigns that level to the wires
	/// it produces. Returns the level.
	pub fn update_instruction_tree(
		&self,
		inst: &Instruction<'_>,
		tree: &mut InstructionTree,
	) -> Result<Level, CalldataError> {
		match self {
			Blueprint::GenericR1c(b) => b.update_instruction_tree(inst, tree),
			Blueprint::GenericSparseR1c(b) => b.update_instruction_tree(inst, tree),
			Blueprint::SparseR1cMul(b) => b.update_instruction_tree(inst, tree),
			Blueprint::SparseR1cAdd(b) => b.update_instruction_tree(inst, tree),
			Blueprint::SparseR1cBool(b) => b.update_instruction_tree(inst, tree),
			Blueprint::GenericHint(b) => b.update_instruction_tree(inst, tree),
			Blueprint::Lookup(b) => b.update_instruction_tree(inst, tree),
		}
	}

	/// Returns `true` if [`Self::solve`] is supported.
	pub fn is_solvable(&self) -> bool {
		matches!(
			self,
			Blueprint::GenericR1c(_)
				| Blueprint::GenericSparseR1c(_)
				| Blueprint::SparseR1cMul(_)
				| Blueprint::SparseR1cAdd(_)
				| Blueprint::Lookup(_)
		)
	}

	/// Returns `true` if [`Self::reset`] must be called before every solve.
	pub fn is_stateful(&self) -> bool {
		matches!(self, Blueprint::Lookup(_))
	}

	/// The payload this blueprint compresses.
	pub fn payload_kind(&self) -> PayloadKind {
		match self {
			Blueprint::GenericR1c(_) => PayloadKind::R1c,
			Blueprint::GenericSparseR1c(_)
			| Blueprint::SparseR1cMul(_)
			| Blueprint::SparseR1cAdd(_)
			| Blueprint::SparseR1cBool(_) => PayloadKind::SparseR1c,
			Blueprint::GenericHint(_) => PayloadKind::Hint,
			Blueprint::Lookup(_) => PayloadKind::Lookup,
		}
	}

	/// Solves the instruction, writing its unknown wires through `solver`.
	///
	/// # Panics
	/// Panics if the blueprint is not solvable.
	pub fn solve<S: Solver<F>>(
		&mut self,
		solver: &mut S,
		inst: &Instruction<'_>,
	) -> Result<(), SolveError> {
		match self {
			Blueprint::GenericR1c(b) => b.solve(solver, inst),
			Blueprint::GenericSparseR1c(b) => b.solve(solver, inst),
			Blueprint::SparseR1cMul(b) => b.solve(solver, inst),
			Blueprint::SparseR1cAdd(b) => b.solve(solver, inst),
			Blueprint::Lookup(b) => b.solve(solver, inst),
			Blueprint::SparseR1cBool(_) | Blueprint::GenericHint(_) => {
				panic!("blueprint {} is not solvable", self.name())
			}
		}
	}

	/// Restores the blueprint to its freshly constructed state.
	///
	/// # Panics
	/// Panics if the blueprint is not stateful.
	pub fn reset(&mut self) {
		match self {
			Blueprint::Lookup(b) => b.reset(),
			_ => panic!("blueprint {} is not stateful", self.name()),
		}
	}

	/// Appends the calldata of `c` to `to`.
	///
	/// # Panics
	/// Panics if the blueprint does not encode R1Cs.
	pub fn compress_r1c(&self, c: &R1c, to: &mut Vec<u32>) {
		match self {
			Blueprint::GenericR1c(b) => b.compress(c, to),
			_ => panic!("blueprint {} does not encode R1C", self.name()),
		}
	}

	/// Recovers the R1C of an instruction.
	///
	/// # Panics
	/// Panics if the blueprint does not encode R1Cs.
	pub fn decompress_r1c(&self, inst: &Instruction<'_>) -> Result<R1c, CalldataError> {
		match self {
			Blueprint::GenericR1c(b) => b.decompress(inst),
			_ => panic!("blueprint {} does not encode R1C", self.name()),
		}
	}

	/// Appends the calldata of `c` to `to`.
	///
	/// # Panics
	/// Panics if the blueprint does not encode sparse R1Cs or if `c` does not have the shape
	/// the blueprint is specialized for.
	pub fn compress_sparse_r1c(&self, c: &SparseR1c, to: &mut Vec<u32>) {
		match self {
			Blueprint::GenericSparseR1c(b) => b.compress(c, to),
			Blueprint::SparseR1cMul(b) => b.compress(c, to),
			Blueprint::SparseR1cAdd(b) => b.compress(c, to),
			Blueprint::SparseR1cBool(b) => b.compress(c, to),
			_ => panic!("blueprint {} does not encode sparse R1C", self.name()),
		}
	}

	/// Recovers the sparse R1C of an instruction.
	///
	/// # Panics
	/// Panics if the blueprint does not encode sparse R1Cs.
	pub fn decompress_sparse_r1c(&self, inst: &Instruction<'_>) -> Result<SparseR1c, CalldataError> {
		match self {
			Blueprint::GenericSparseR1c(b) => b.decompress(inst),
			Blueprint::SparseR1cMul(b) => b.decompress(inst),
			Blueprint::SparseR1cAdd(b) => b.decompress(inst),
			Blueprint::SparseR1cBool(b) => b.decompress(inst),
			_ => panic!("blueprint {} does not encode sparse R1C", self.name()),
		}
	}

	/// Appends the calldata of a lookup of `queries` into `entries` to `to`.
	///
	/// # Panics
	/// Panics if the blueprint is not a lookup.
	pub fn compress_lookup(
		&self,
		entries: &[LinearExpression],
		queries: &[LinearExpression],
		to: &mut Vec<u32>,
	) {
		match self {
			Blueprint::Lookup(_) => Lookup::<F>::compress(entries, queries, to),
			_ => panic!("blueprint {} is not a lookup", self.name()),
		}
	}

	/// Runs the hint call of an instruction, resolving the hint in `hints`.
	///
	/// # Panics
	/// Panics if the blueprint does not encode hints.
	pub fn solve_hint<S: Solver<F>>(
		&self,
		solver: &mut S,
		inst: &Instruction<'_>,
		hints: &HintRegistry<F>,
	) -> Result<(), SolveError> {
		match self {
			Blueprint::GenericHint(b) => b.solve_with(solver, inst, hints),
			_ => panic!("blueprint {} does not encode hints", self.name()),
		}
	}

	/// Appends the calldata of `h` to `to`.
	///
	/// # Panics
	/// Panics if the blueprint does not encode hints.
	pub fn compress_hint(&self, h: &HintMapping, to: &mut Vec<u32>) {
		match self {
			Blueprint::GenericHint(b) => b.compress(h, to),
			_ => panic!("blueprint {} does not encode hints", self.name()),
		}
	}

	/// Recovers the hint mapping of an instruction.
	///
	/// # Panics
	/// Panics if the blueprint does not encode hints.
	pub fn decompress_hint(&self, inst: &Instruction<'_>) -> Result<HintMapping, CalldataError> {
		match self {
			Blueprint::GenericHint(b) => b.decompress(inst),
			_ => panic!("blueprint {} does not encode hints", self.name()),
		}
	}

	/// The coefficient ids an instruction refers to, in calldata order.
	pub fn coeff_ids(&self, inst: &Instruction<'_>) -> Result<Vec<u32>, CalldataError> {
		match self {
			Blueprint::GenericR1c(b) => {
				let c = b.decompress(inst)?;
				Ok(coeff_ids_of([&c.l, &c.r, &c.o]))
			}
			Blueprint::GenericSparseR1c(_)
			| Blueprint::SparseR1cMul(_)
			| Blueprint::SparseR1cAdd(_)
			| Blueprint::SparseR1cBool(_) => {
				let c = self.decompress_sparse_r1c(inst)?;
				Ok(vec![c.ql, c.qr, c.qo, c.qm, c.qc])
			}
			Blueprint::GenericHint(b) => Ok(coeff_ids_of(&b.decompress(inst)?.inputs)),
			Blueprint::Lookup(b) => {
				let (entries, queries) = b.decompress(inst)?;
				Ok(coeff_ids_of(entries.iter().chain(&queries)))
			}
		}
	}
}

fn coeff_ids_of<'e>(exprs: impl IntoIterator<Item = &'e LinearExpression>) -> Vec<u32> {
	exprs
		.into_iter()
		.flat_map(|expr| &expr.0)
		.map(|term| term.coeff_id)
		.collect()
}

/// Wraps a decoding error of an instruction.
pub(crate) fn calldata_error(inst: &Instruction<'_>) -> impl FnOnce(CalldataError) -> SolveError {
	let instruction = inst.index();
	move |source| SolveError::Calldata {
		instruction,
		source,
	}
}

/// Evaluates the next compressed linear expression of `reader` with [`Solver::read`].
pub(crate) fn read_expression<F: Field, S: Solver<F>>(
	solver: &S,
	reader: &mut CalldataReader<'_>,
	inst: &Instruction<'_>,
) -> Result<F, SolveError> {
	let words = reader
		.read_linear_expression_words()
		.map_err(calldata_error(inst))?;
	let (value, consumed) = solver.read(words);
	if consumed != words.len() {
		return Err(calldata_error(inst)(CalldataError::TrailingWords {
			consumed,
			len: words.len(),
		}));
	}
	Ok(value)
}
