// Copyright 2025 Irreducible Inc.
//! Encoding-level constants of the calldata format.

/// Coefficient id reserved for `0`.
pub const COEFF_ID_ZERO: u32 = 0;

/// Coefficient id reserved for `1`.
pub const COEFF_ID_ONE: u32 = 1;

/// Coefficient id reserved for `2`.
pub const COEFF_ID_TWO: u32 = 2;

/// Coefficient id reserved for `-1`.
pub const COEFF_ID_MINUS_ONE: u32 = 3;

/// Coefficient id reserved for `-2`.
pub const COEFF_ID_MINUS_TWO: u32 = 4;

/// The number of coefficient ids every [`crate::CoeffTable`] reserves up front.
pub const N_RESERVED_COEFFS: usize = 5;

/// The number of words a single compressed [`crate::Term`] occupies.
pub const TERM_WORDS: usize = 2;

/// The number of words taken by the self-describing length prefix of an instruction whose
/// blueprint reports [`crate::CalldataSize::Unknown`].
pub const LENGTH_PREFIX_WORDS: usize = 1;
