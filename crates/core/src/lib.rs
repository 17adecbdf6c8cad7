// Copyright 2025 Irreducible Inc.
//! Core datatypes shared by every Tessera blueprint and by the solver runtime.
//!
//! Most importantly it hosts the calldata codec: the flat stream of 32-bit words every
//! instruction of a circuit compresses itself into, see [`calldata`].

#![warn(missing_docs)]

pub mod calldata;
pub mod coeff;
pub mod consts;
pub mod error;
pub mod field;
pub mod goldilocks;
pub mod payload;
pub mod term;

pub use calldata::{CalldataReader, CalldataSize, Compressible};
pub use coeff::CoeffTable;
pub use error::CalldataError;
pub use field::Field;
pub use goldilocks::Goldilocks;
pub use payload::{HintMapping, R1c, SparseR1c, WireRange};
pub use term::{LinearExpression, Term};
