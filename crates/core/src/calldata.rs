// Copyright 2025 Irreducible Inc.
//! The calldata codec.
//!
//! Calldata is a flat, append-only stream of 32-bit words shared by every instruction of a
//! circuit. Each instruction owns a contiguous sub-range. The size of the range is either fixed
//! by the blueprint ([`CalldataSize::Fixed`]) or, for variable-arity instructions, stored in the
//! first word of the range ([`CalldataSize::Unknown`]). The prefix counts itself:
//!
//! ```text
//! | len | payload ... |
//!   ^-------------------^ len words
//! ```
//!
//! There is no generic decoder. Only the blueprint that wrote a range knows its shape, so
//! decoding always goes through the blueprint with a [`CalldataReader`] that refuses to read
//! outside of the range.

use crate::{
	consts::{LENGTH_PREFIX_WORDS, TERM_WORDS},
	error::CalldataError,
	term::{LinearExpression, Term},
};

/// A value that knows how to encode itself as a sequence of calldata words.
pub trait Compressible {
	/// Appends the encoding of this value to `to`.
	fn compress(&self, to: &mut Vec<u32>);
}

/// The number of calldata words an instruction of a blueprint occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalldataSize {
	/// Every instruction has exactly this many words.
	Fixed(usize),
	/// The size varies per instruction and is stored in the first word of the range.
	Unknown,
}

impl CalldataSize {
	/// Returns the fixed size, if any.
	pub fn fixed(self) -> Option<usize> {
		match self {
			CalldataSize::Fixed(n) => Some(n),
			CalldataSize::Unknown => None,
		}
	}
}

/// Appends a length-prefixed range to `to`.
///
/// A placeholder word is pushed, `encode` appends the payload and the placeholder is then patched
/// with the total number of words of the range, prefix included.
pub fn with_length_prefix(to: &mut Vec<u32>, encode: impl FnOnce(&mut Vec<u32>)) {
	let start = to.len();
	to.push(0);
	encode(to);
	to[start] = (to.len() - start) as u32;
}

/// Reads the length prefix of a self-describing range.
pub fn length_prefix(calldata: &[u32]) -> Result<usize, CalldataError> {
	calldata
		.first()
		.map(|&len| len as usize)
		.ok_or(CalldataError::EmptyLengthPrefix)
}

/// Splits a fixed-size range into its words.
pub fn fixed_words<const N: usize>(calldata: &[u32]) -> Result<[u32; N], CalldataError> {
	calldata
		.try_into()
		.map_err(|_| CalldataError::SizeMismatch {
			expected: N,
			actual: calldata.len(),
		})
}

/// A bounded cursor over the calldata range of a single instruction.
pub struct CalldataReader<'a> {
	calldata: &'a [u32],
	pos: usize,
}

impl<'a> CalldataReader<'a> {
	/// Creates a reader over a range whose length is known by the caller.
	pub fn new(calldata: &'a [u32]) -> Self {
		Self { calldata, pos: 0 }
	}

	/// Creates a reader over a self-describing range.
	///
	/// The prefix is checked against the length of the slice and then skipped.
	pub fn with_length_prefix(calldata: &'a [u32]) -> Result<Self, CalldataError> {
		let prefix = length_prefix(calldata)?;
		if prefix != calldata.len() {
			return Err(CalldataError::LengthMismatch {
				prefix,
				actual: calldata.len(),
			});
		}
		Ok(Self {
			calldata,
			pos: LENGTH_PREFIX_WORDS,
		})
	}

	/// The number of words consumed so far, including a skipped length prefix.
	pub fn consumed(&self) -> usize {
		self.pos
	}

	/// The number of words left in the range.
	pub fn remaining(&self) -> usize {
		self.calldata.len() - self.pos
	}

	/// Reads the next `n` words.
	pub fn read_slice(&mut self, n: usize) -> Result<&'a [u32], CalldataError> {
		let end = self
			.pos
			.checked_add(n)
			.filter(|&end| end <= self.calldata.len())
			.ok_or(CalldataError::OutOfBounds {
				offset: self.pos,
				requested: n,
				len: self.calldata.len(),
			})?;
		let words = &self.calldata[self.pos..end];
		self.pos = end;
		Ok(words)
	}

	/// Reads the next word.
	pub fn read_u32(&mut self) -> Result<u32, CalldataError> {
		Ok(self.read_slice(1)?[0])
	}

	/// Reads the next word as a length or count.
	pub fn read_len(&mut self) -> Result<usize, CalldataError> {
		self.read_u32().map(|n| n as usize)
	}

	/// Reads a single term.
	pub fn read_term(&mut self) -> Result<Term, CalldataError> {
		let words = self.read_slice(TERM_WORDS)?;
		Ok(Term::new(words[0], words[1]))
	}

	/// Reads `n` consecutive terms that are not preceded by a count.
	pub fn read_terms(&mut self, n: usize) -> Result<LinearExpression, CalldataError> {
		let words = self.read_slice(n.saturating_mul(TERM_WORDS))?;
		Ok(words
			.chunks_exact(TERM_WORDS)
			.map(|pair| Term::new(pair[0], pair[1]))
			.collect())
	}

	/// Reads a compressed linear expression.
	pub fn read_linear_expression(&mut self) -> Result<LinearExpression, CalldataError> {
		let n_terms = self.read_len()?;
		self.read_terms(n_terms)
	}

	/// Returns the words of the next compressed linear expression without decoding its terms.
	///
	/// The returned slice starts with the term count and is what a solver evaluates.
	pub fn read_linear_expression_words(&mut self) -> Result<&'a [u32], CalldataError> {
		let start = self.pos;
		let n_terms = self.read_len()?;
		self.read_slice(n_terms.saturating_mul(TERM_WORDS))?;
		Ok(&self.calldata[start..self.pos])
	}

	/// Ensures the whole range was consumed.
	pub fn finish(self) -> Result<(), CalldataError> {
		if self.pos != self.calldata.len() {
			return Err(CalldataError::TrailingWords {
				consumed: self.pos,
				len: self.calldata.len(),
			});
		}
		Ok(())
	}
}
