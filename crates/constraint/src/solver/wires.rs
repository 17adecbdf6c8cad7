// Copyright 2025 Irreducible Inc.
use tessera_core::{CoeffTable, Field};

use super::Solver;
use crate::error::SolveError;

/// The committed assignment of every wire of a system.
#[derive(Clone, Debug)]
pub struct WireValues<F> {
	values: Vec<Option<F>>,
}

impl<F: Field> WireValues<F> {
	/// Creates an assignment of `n_wires` unsolved wires.
	pub fn new(n_wires: usize) -> Self {
		Self {
			values: vec![None; n_wires],
		}
	}

	/// The value of a wire, `None` if it is unsolved.
	pub fn get(&self, wire: u32) -> Option<F> {
		self.values.get(wire as usize).copied().flatten()
	}

	/// Assigns a wire, idempotent for an equal value.
	///
	/// # Panics
	/// Panics if the wire does not exist.
	pub fn set(&mut self, wire: u32, value: F) -> Result<(), SolveError> {
		let slot = &mut self.values[wire as usize];
		match slot {
			Some(old) if *old != value => Err(SolveError::ConsistencyViolation { wire }),
			Some(_) => Ok(()),
			None => {
				*slot = Some(value);
				Ok(())
			}
		}
	}

	/// Converts into the final solution, failing if any wire is still unsolved.
	pub fn into_solution(self) -> Result<Solution<F>, SolveError> {
		let unsolved = self.values.iter().filter(|v| v.is_none()).count();
		if let Some(first) = self.values.iter().position(Option::is_none) {
			return Err(SolveError::UnsolvedWires {
				count: unsolved,
				first: first as u32,
			});
		}
		Ok(Solution {
			values: self.values.into_iter().flatten().collect(),
		})
	}
}

pub(crate) fn get_value<F: Field>(
	coeffs: &CoeffTable<F>,
	coeff_id: u32,
	wire: u32,
	value: Option<F>,
) -> F {
	let value = value.unwrap_or_else(|| panic!("wire {wire} is read before it is solved"));
	coeffs.get(coeff_id) * value
}

/// A [`Solver`] writing straight into the committed assignment.
///
/// Used for levels that are solved sequentially.
pub struct DirectSolver<'a, F: Field> {
	coeffs: &'a CoeffTable<F>,
	wires: &'a mut WireValues<F>,
}

impl<'a, F: Field> DirectSolver<'a, F> {
	/// Creates a new solver.
	pub fn new(coeffs: &'a CoeffTable<F>, wires: &'a mut WireValues<F>) -> Self {
		Self { coeffs, wires }
	}
}

impl<F: Field> Solver<F> for DirectSolver<'_, F> {
	fn get_value(&self, coeff_id: u32, wire: u32) -> F {
		get_value(self.coeffs, coeff_id, wire, self.wires.get(wire))
	}

	fn get_coeff(&self, coeff_id: u32) -> F {
		self.coeffs.get(coeff_id)
	}

	fn set_value(&mut self, wire: u32, value: F) -> Result<(), SolveError> {
		self.wires.set(wire, value)
	}

	fn is_solved(&self, wire: u32) -> bool {
		self.wires.get(wire).is_some()
	}
}

/// The value of every wire of a solved system, indexed by wire id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<F> {
	values: Vec<F>,
}

impl<F: Field> Solution<F> {
	/// The value of a wire.
	///
	/// # Panics
	/// Panics if the wire does not exist.
	pub fn get(&self, wire: u32) -> F {
		self.values[wire as usize]
	}

	/// All values, indexed by wire id.
	pub fn values(&self) -> &[F] {
		&self.values
	}

	/// The number of wires.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns `true` for a system without wires.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}
