// Copyright 2025 Irreducible Inc.

//! Blueprint-compressed constraint systems and their level-scheduled solver.
//!
//! A circuit is a long, heterogeneous list of constraints and hints ("instructions") over wires
//! holding field elements. Storing each of them as a full object does not scale to millions of
//! constraints, so every instruction is instead compressed by a [`Blueprint`] into a flat stream
//! of 32-bit words (calldata, see [`tessera_core::calldata`]).
//!
//! # Usage Flow
//!
//! Create a [`System`], register the blueprints you need with [`System::add_blueprint`] and
//! allocate input wires with [`System::add_public_input`] and [`System::add_secret_input`].
//! Then append instructions with [`System::add_r1c`], [`System::add_sparse_r1c`],
//! [`System::add_hint`] and friends. Every appended instruction is placed on a dependency
//! [`Level`]: all instructions of a level are independent of each other.
//!
//! To compute the wire values, create a [`SolverRuntime`] over the system, the input values and
//! a [`HintRegistry`], and call [`SolverRuntime::solve`]. Levels are solved in increasing order,
//! the instructions of a wide level in parallel.
//!
//! Use [`SystemStat`] to inspect metrics like the number of levels and the calldata footprint.

#![warn(missing_docs)]

pub mod blueprint;
pub mod config;
pub mod error;
pub mod fault;
pub mod hints;
pub mod instruction;
pub mod solver;
pub mod stat;
pub mod system;
pub mod tree;

#[cfg(test)]
mod tests;

pub use blueprint::{Blueprint, BlueprintId, PayloadKind};
pub use config::SolverConfig;
pub use error::SolveError;
pub use fault::{FaultConfig, FaultInjector, FaultSource, NoFaults};
pub use hints::{Hint, HintError, HintId, HintRegistry};
pub use instruction::{Instruction, InstructionId, PackedInstruction};
pub use solver::{Solution, Solver, SolverRuntime};
pub use stat::SystemStat;
pub use system::{Appended, System};
pub use tree::{InstructionTree, Level};
