// Copyright 2025 Irreducible Inc.
//! Terms and linear expressions as they appear inside calldata.

use std::ops::Deref;

use crate::{calldata::Compressible, consts::TERM_WORDS};

/// A single `coefficient * wire` product.
///
/// The coefficient is referenced by its id in the [`crate::CoeffTable`] of the system, never by
/// value, so a term is always two words wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
	/// Id of the coefficient in the coefficient table.
	pub coeff_id: u32,
	/// Id of the wire.
	pub wire_id: u32,
}

impl Term {
	/// Creates a new term.
	pub fn new(coeff_id: u32, wire_id: u32) -> Self {
		Self { coeff_id, wire_id }
	}
}

impl Compressible for Term {
	fn compress(&self, to: &mut Vec<u32>) {
		to.push(self.coeff_id);
		to.push(self.wire_id);
	}
}

/// A sum of [`Term`]s.
///
/// Compressed as `[n_terms, coeff_id_0, wire_id_0, coeff_id_1, wire_id_1, ...]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LinearExpression(pub Vec<Term>);

impl LinearExpression {
	/// Creates an expression out of the given terms.
	pub fn new(terms: Vec<Term>) -> Self {
		Self(terms)
	}

	/// The number of words [`Compressible::compress`] appends for this expression.
	pub fn compressed_len(&self) -> usize {
		1 + TERM_WORDS * self.0.len()
	}

	/// Iterates over the wires this expression references.
	pub fn wires(&self) -> impl Iterator<Item = u32> + '_ {
		self.0.iter().map(|term| term.wire_id)
	}
}

impl Deref for LinearExpression {
	type Target = [Term];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<Term> for LinearExpression {
	fn from(term: Term) -> Self {
		Self(vec![term])
	}
}

impl FromIterator<Term> for LinearExpression {
	fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl Compressible for LinearExpression {
	fn compress(&self, to: &mut Vec<u32>) {
		to.reserve(self.compressed_len());
		to.push(self.0.len() as u32);
		for term in &self.0 {
			term.compress(to);
		}
	}
}
