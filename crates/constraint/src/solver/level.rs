// Copyright 2025 Irreducible Inc.
use smallvec::SmallVec;
use tessera_core::{CoeffTable, Field};

use super::{Solver, WireValues, wires::get_value};
use crate::error::SolveError;

/// A [`Solver`] for one instruction of a level that is solved in parallel.
///
/// Reads go to the committed assignment of the lower levels, writes are buffered and committed
/// with [`Self::commit`] once the whole level is done.
pub struct LevelSolver<'a, F: Field> {
	coeffs: &'a CoeffTable<F>,
	committed: &'a WireValues<F>,
	pending: SmallVec<[(u32, F); 4]>,
}

impl<'a, F: Field> LevelSolver<'a, F> {
	/// Creates a solver with an empty write buffer.
	pub fn new(coeffs: &'a CoeffTable<F>, committed: &'a WireValues<F>) -> Self {
		Self {
			coeffs,
			committed,
			pending: SmallVec::new(),
		}
	}

	fn pending(&self, wire: u32) -> Option<F> {
		self.pending
			.iter()
			.find_map(|&(w, value)| (w == wire).then_some(value))
	}

	/// Releases the buffered writes.
	pub fn into_pending(self) -> SmallVec<[(u32, F); 4]> {
		self.pending
	}

	/// Writes buffered values into `wires`, in buffer order.
	pub fn commit(
		pending: impl IntoIterator<Item = (u32, F)>,
		wires: &mut WireValues<F>,
	) -> Result<(), SolveError> {
		pending
			.into_iter()
			.try_for_each(|(wire, value)| wires.set(wire, value))
	}
}

impl<F: Field> Solver<F> for LevelSolver<'_, F> {
	fn get_value(&self, coeff_id: u32, wire: u32) -> F {
		let value = self.committed.get(wire).or_else(|| self.pending(wire));
		get_value(self.coeffs, coeff_id, wire, value)
	}

	fn get_coeff(&self, coeff_id: u32) -> F {
		self.coeffs.get(coeff_id)
	}

	fn set_value(&mut self, wire: u32, value: F) -> Result<(), SolveError> {
		match self.committed.get(wire).or_else(|| self.pending(wire)) {
			Some(old) if old != value => Err(SolveError::ConsistencyViolation { wire }),
			Some(_) => Ok(()),
			None => {
				self.pending.push((wire, value));
				Ok(())
			}
		}
	}

	fn is_solved(&self, wire: u32) -> bool {
		self.committed.get(wire).is_some() || self.pending(wire).is_some()
	}
}
