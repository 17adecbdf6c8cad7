// Copyright 2025 Irreducible Inc.
//! Hosts error definitions for the core crate.

/// Calldata decoding error.
///
/// None of these can happen while decoding calldata that was produced by the same blueprint, so
/// any of them means either a codec bug or corrupted calldata.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalldataError {
	#[error("read of {requested} words at offset {offset} overruns a calldata range of {len} words")]
	OutOfBounds {
		offset: usize,
		requested: usize,
		len: usize,
	},
	#[error("decoding stopped after {consumed} words, but the calldata range holds {len} words")]
	TrailingWords { consumed: usize, len: usize },
	#[error("length prefix says {prefix} words, but the calldata range holds {actual} words")]
	LengthMismatch { prefix: usize, actual: usize },
	#[error("calldata range with an unknown size has no length prefix")]
	EmptyLengthPrefix,
	#[error("blueprint expects {expected} calldata words, got {actual}")]
	SizeMismatch { expected: usize, actual: usize },
	#[error("outputs start at wire {start}, but the instruction allocated wires from {expected}")]
	OutputsMisplaced { start: u32, expected: u32 },
	#[error("wire range {start}..{end} is reversed")]
	ReversedRange { start: u32, end: u32 },
	#[error("wire {wire} is checked before any instruction produces it")]
	UnproducedWire { wire: u32 },
	#[error("coefficient id {coeff_id} is not in a table of {len} coefficients")]
	UnknownCoeff { coeff_id: u32, len: usize },
	#[error("wire range starting at {start} with {len} wires overflows the wire ids")]
	WireOverflow { start: u32, len: usize },
}
