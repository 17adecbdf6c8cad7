// Copyright 2025 Irreducible Inc.
//! Solver configuration.

use std::env;

/// Default minimal number of instructions in a level for it to be solved in parallel.
pub const DEFAULT_MIN_PARALLEL_WIDTH: usize = 64;

/// Knobs of the [`crate::SolverRuntime`].
#[derive(Debug, Clone)]
pub struct SolverConfig {
	/// Solve wide levels on the rayon thread pool.
	pub parallel: bool,
	/// Levels with fewer instructions than this are solved sequentially even when
	/// [`Self::parallel`] is set.
	pub min_parallel_width: usize,
}

impl Default for SolverConfig {
	fn default() -> Self {
		Self {
			parallel: true,
			min_parallel_width: DEFAULT_MIN_PARALLEL_WIDTH,
		}
	}
}

impl SolverConfig {
	/// A configuration that solves every level on the calling thread.
	pub fn sequential() -> Self {
		Self {
			parallel: false,
			..Self::default()
		}
	}

	/// Create configuration from environment variables
	///
	/// Reads `SOLVER_PARALLEL` (`0`/`false` disables parallelism) and
	/// `SOLVER_MIN_PARALLEL_WIDTH`.
	pub fn from_env() -> Self {
		let parallel = env::var("SOLVER_PARALLEL")
			.ok()
			.map(|s| !matches!(s.trim(), "0" | "false" | "off"))
			.unwrap_or(true);

		let min_parallel_width = env::var("SOLVER_MIN_PARALLEL_WIDTH")
			.ok()
			.and_then(|s| s.parse::<usize>().ok())
			.unwrap_or(DEFAULT_MIN_PARALLEL_WIDTH);

		Self {
			parallel,
			min_parallel_width,
		}
	}
}
