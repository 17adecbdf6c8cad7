// Copyright 2025 Irreducible Inc.
//! Solving a constraint system: the [`Solver`] contract blueprints solve against and the
//! level-scheduled [`SolverRuntime`].

use tessera_core::{Field, Term, consts::TERM_WORDS};

use crate::error::SolveError;

mod level;
mod runtime;
mod wires;

pub use level::LevelSolver;
pub use runtime::SolverRuntime;
pub use wires::{DirectSolver, Solution, WireValues};

/// The view of the wire assignment a blueprint solves against.
pub trait Solver<F: Field> {
	/// Returns `coeff ⋅ value(wire)`.
	///
	/// # Panics
	/// Panics if the wire is not solved. Leveling guarantees that every wire an instruction reads
	/// is solved by a lower level, so hitting this means the blueprint read a wire it claimed.
	fn get_value(&self, coeff_id: u32, wire: u32) -> F;

	/// Returns the value of a coefficient id.
	fn get_coeff(&self, coeff_id: u32) -> F;

	/// Assigns a wire.
	///
	/// Setting a solved wire to the same value again is a no-op, setting it to a different value
	/// fails with [`SolveError::ConsistencyViolation`].
	fn set_value(&mut self, wire: u32, value: F) -> Result<(), SolveError>;

	/// Returns `true` if the wire has a value.
	fn is_solved(&self, wire: u32) -> bool;

	/// Evaluates a compressed linear expression `[n, coeff_id, wire_id, ...]`.
	///
	/// Returns the value and the number of words consumed, `1 + 2⋅n`.
	///
	/// # Panics
	/// Panics if `calldata` is shorter than the expression it starts with.
	fn read(&self, calldata: &[u32]) -> (F, usize) {
		let n_terms = calldata[0] as usize;
		let len = 1 + TERM_WORDS * n_terms;
		let value = calldata[1..len]
			.chunks_exact(TERM_WORDS)
			.fold(F::ZERO, |acc, pair| acc + self.get_value(pair[0], pair[1]));
		(value, len)
	}

	/// Returns `coeff ⋅ value(wire)` of a term.
	fn term_value(&self, term: Term) -> F {
		self.get_value(term.coeff_id, term.wire_id)
	}
}
