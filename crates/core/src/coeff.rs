// Copyright 2025 Irreducible Inc.
//! Deduplicated coefficient storage.

use std::collections::HashMap;

use crate::{
	consts::{
		COEFF_ID_MINUS_ONE, COEFF_ID_MINUS_TWO, COEFF_ID_ONE, COEFF_ID_TWO, COEFF_ID_ZERO,
		N_RESERVED_COEFFS,
	},
	field::Field,
};

/// Maps coefficient ids used in calldata to field elements.
///
/// The first [`N_RESERVED_COEFFS`] ids are reserved for `0, 1, 2, -1, -2`. Every other
/// coefficient gets an id on first use and keeps it.
#[derive(Clone, Debug)]
pub struct CoeffTable<F: Field> {
	coeffs: Vec<F>,
	index: HashMap<F, u32>,
}

impl<F: Field> CoeffTable<F> {
	/// Creates a table holding only the reserved coefficients.
	pub fn new() -> Self {
		let two = F::ONE.double();
		let reserved = [
			(COEFF_ID_ZERO, F::ZERO),
			(COEFF_ID_ONE, F::ONE),
			(COEFF_ID_TWO, two),
			(COEFF_ID_MINUS_ONE, -F::ONE),
			(COEFF_ID_MINUS_TWO, -two),
		];
		let mut table = Self {
			coeffs: Vec::with_capacity(N_RESERVED_COEFFS),
			index: HashMap::new(),
		};
		for (id, value) in reserved {
			debug_assert_eq!(id as usize, table.coeffs.len());
			table.coeffs.push(value);
			// Small fields may collapse reserved values (2 == -1 in GF(3)). Keep the lowest id.
			table.index.entry(value).or_insert(id);
		}
		table
	}

	/// Returns the id of `coeff`, inserting it if it is not yet known.
	pub fn insert(&mut self, coeff: F) -> u32 {
		if let Some(&id) = self.index.get(&coeff) {
			return id;
		}
		let id = self.coeffs.len() as u32;
		self.coeffs.push(coeff);
		self.index.insert(coeff, id);
		id
	}

	/// Returns the coefficient with the given id.
	///
	/// # Panics
	/// Panics if the id was never handed out by this table.
	pub fn get(&self, coeff_id: u32) -> F {
		self.coeffs[coeff_id as usize]
	}

	/// The number of distinct ids, reserved ones included.
	pub fn len(&self) -> usize {
		self.coeffs.len()
	}

	/// Always `false`, the reserved coefficients are always present.
	pub fn is_empty(&self) -> bool {
		self.coeffs.is_empty()
	}
}

impl<F: Field> Default for CoeffTable<F> {
	fn default() -> Self {
		Self::new()
	}
}
