// Copyright 2025 Irreducible Inc.
//! [`Goldilocks`] related definitions.

use std::{
	fmt,
	ops::{Add, Mul, Neg, Sub},
};

use crate::field::Field;

/// An element of the prime field of order `p = 2^64 - 2^32 + 1`.
///
/// It is the reference [`Field`] of this crate. The representation is always canonical, i.e.
/// the inner value is less than [`Goldilocks::ORDER`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Goldilocks(u64);

impl Goldilocks {
	/// The field order.
	pub const ORDER: u64 = 0xFFFF_FFFF_0000_0001;

	/// Creates a new element, reducing the value modulo [`Self::ORDER`].
	pub const fn new(value: u64) -> Self {
		if value >= Self::ORDER {
			Goldilocks(value - Self::ORDER)
		} else {
			Goldilocks(value)
		}
	}

	/// Returns the canonical representative.
	pub const fn as_canonical_u64(&self) -> u64 {
		self.0
	}

	/// Raises this element to the given power.
	pub fn pow(self, mut exp: u64) -> Self {
		let mut base = self;
		let mut acc = Goldilocks(1);
		while exp != 0 {
			if exp & 1 == 1 {
				acc = acc * base;
			}
			base = base * base;
			exp >>= 1;
		}
		acc
	}
}

impl fmt::Debug for Goldilocks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Goldilocks({})", self.0)
	}
}

impl fmt::Display for Goldilocks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Add for Goldilocks {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		let sum = self.0 as u128 + rhs.0 as u128;
		Goldilocks((sum % Self::ORDER as u128) as u64)
	}
}

impl Sub for Goldilocks {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		if self.0 >= rhs.0 {
			Goldilocks(self.0 - rhs.0)
		} else {
			Goldilocks(Self::ORDER - rhs.0 + self.0)
		}
	}
}

impl Mul for Goldilocks {
	type Output = Self;

	fn mul(self, rhs: Self) -> Self::Output {
		let product = self.0 as u128 * rhs.0 as u128;
		Goldilocks((product % Self::ORDER as u128) as u64)
	}
}

impl Neg for Goldilocks {
	type Output = Self;

	fn neg(self) -> Self::Output {
		if self.0 == 0 {
			self
		} else {
			Goldilocks(Self::ORDER - self.0)
		}
	}
}

impl From<u64> for Goldilocks {
	fn from(value: u64) -> Self {
		Goldilocks::new(value)
	}
}

impl Field for Goldilocks {
	const ZERO: Self = Goldilocks(0);
	const ONE: Self = Goldilocks(1);

	fn from_u64(value: u64) -> Self {
		Goldilocks::new(value)
	}

	fn invert(&self) -> Option<Self> {
		if self.0 == 0 {
			return None;
		}
		// Fermat: a^(p-2) = a^-1
		Some(self.pow(Self::ORDER - 2))
	}

	fn try_to_u64(&self) -> Option<u64> {
		Some(self.0)
	}
}
