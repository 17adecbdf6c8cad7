// Copyright 2025 Irreducible Inc.
//! The field capability consumed by blueprints and the solver.

use std::{
	fmt::Debug,
	hash::Hash,
	ops::{Add, Mul, Neg, Sub},
};

/// An element of a prime field.
///
/// Neither the codec nor the solver looks inside an element. They only need the usual field
/// operations and equality, so any prime field can back a constraint system.
pub trait Field:
	Copy
	+ Debug
	+ Default
	+ Eq
	+ Hash
	+ Send
	+ Sync
	+ 'static
	+ Add<Output = Self>
	+ Sub<Output = Self>
	+ Mul<Output = Self>
	+ Neg<Output = Self>
{
	/// The additive identity.
	const ZERO: Self;
	/// The multiplicative identity.
	const ONE: Self;

	/// Maps an integer into the field, reducing it if needed.
	fn from_u64(value: u64) -> Self;

	/// Returns the multiplicative inverse, or `None` for zero.
	fn invert(&self) -> Option<Self>;

	/// Returns the canonical integer representative if it fits into a `u64`.
	fn try_to_u64(&self) -> Option<u64>;

	/// Returns `true` if this is the additive identity.
	fn is_zero(&self) -> bool {
		*self == Self::ZERO
	}

	/// Returns `self * self`.
	fn square(&self) -> Self {
		*self * *self
	}

	/// Returns `self + self`.
	fn double(&self) -> Self {
		*self + *self
	}
}
