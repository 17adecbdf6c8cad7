// Copyright 2025 Irreducible Inc.
//! Deterministic fault injection.
//!
//! The solver asks a [`FaultSource`] for a signed delta whenever it unpacks a self-describing
//! calldata range and adds it to the length prefix. With [`NoFaults`] the delta is a constant
//! zero and the whole mechanism compiles away. Tests plug in a [`FaultInjector`] to simulate
//! off-by-one corruption and check that it gets reported instead of silently misdecoded.

use std::{
	env,
	sync::{Mutex, MutexGuard},
};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Default seed of a [`FaultInjector`].
pub const DEFAULT_FAULT_SEED: u64 = 0;

/// Default cap on the total number of injected faults.
pub const DEFAULT_MAX_FAULTS: usize = 1;

/// Default probability of a single call to [`FaultSource::delta`] injecting a fault.
pub const DEFAULT_FAULT_PROBABILITY: f64 = 0.0001;

/// A source of simulated off-by-one errors.
pub trait FaultSource: Send + Sync {
	/// Returns `-1`, `0` or `+1`.
	fn delta(&self) -> i64;
}

/// The production fault source: never injects anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFaults;

impl FaultSource for NoFaults {
	#[inline(always)]
	fn delta(&self) -> i64 {
		0
	}
}

struct FaultState {
	rng: StdRng,
	probability: f64,
	max_faults: usize,
	num_faults: usize,
	num_calls: usize,
}

impl FaultState {
	fn new(seed: u64, max_faults: usize, probability: f64) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
			probability,
			max_faults,
			num_faults: 0,
			num_calls: 0,
		}
	}
}

/// A seeded, bounded source of random `±1` deltas.
///
/// All state lives behind a lock so that one injector can be shared by the solver workers; the
/// call and fault counters always agree with the generator state.
pub struct FaultInjector {
	state: Mutex<FaultState>,
}

impl FaultInjector {
	/// Creates an injector that fires with `probability` per call, at most `max_faults` times.
	pub fn new(seed: u64, max_faults: usize, probability: f64) -> Self {
		Self {
			state: Mutex::new(FaultState::new(seed, max_faults, probability)),
		}
	}

	fn state(&self) -> MutexGuard<'_, FaultState> {
		// The state is never left half-updated, so a poisoned lock is still usable.
		self.state
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Reseeds the generator, replaces the cap and the probability and zeroes both counters.
	pub fn reset(&self, seed: u64, max_faults: usize, probability: f64) {
		*self.state() = FaultState::new(seed, max_faults, probability);
	}

	/// The cap on the total number of injected faults.
	pub fn max_faults(&self) -> usize {
		self.state().max_faults
	}

	/// The number of faults injected since the last reset.
	pub fn num_faults(&self) -> usize {
		self.state().num_faults
	}

	/// The number of calls to [`FaultSource::delta`] since the last reset.
	pub fn num_calls(&self) -> usize {
		self.state().num_calls
	}
}

impl Default for FaultInjector {
	fn default() -> Self {
		Self::new(DEFAULT_FAULT_SEED, DEFAULT_MAX_FAULTS, DEFAULT_FAULT_PROBABILITY)
	}
}

impl FaultSource for FaultInjector {
	fn delta(&self) -> i64 {
		let mut state = self.state();
		state.num_calls += 1;
		if state.num_faults >= state.max_faults {
			return 0;
		}
		let probability = state.probability;
		if state.rng.random::<f64>() < probability {
			let delta = if state.rng.random::<f64>() < 0.5 { -1 } else { 1 };
			state.num_faults += 1;
			tracing::warn!(delta, call = state.num_calls, "injected calldata fault");
			return delta;
		}
		0
	}
}

impl<T: FaultSource + ?Sized> FaultSource for &T {
	fn delta(&self) -> i64 {
		(**self).delta()
	}
}

/// Parameters of a [`FaultInjector`], usually taken from the environment of a test run.
#[derive(Debug, Clone)]
pub struct FaultConfig {
	/// Seed of the generator.
	pub seed: u64,
	/// Cap on the total number of injected faults.
	pub max_faults: usize,
	/// Probability of a single call injecting a fault.
	pub probability: f64,
}

impl Default for FaultConfig {
	fn default() -> Self {
		Self {
			seed: DEFAULT_FAULT_SEED,
			max_faults: DEFAULT_MAX_FAULTS,
			probability: DEFAULT_FAULT_PROBABILITY,
		}
	}
}

impl FaultConfig {
	/// Create configuration from environment variables
	///
	/// Reads `FAULT_SEED`, `FAULT_MAX` and `FAULT_PROBABILITY`, falling back to the defaults for
	/// missing or unparsable values.
	pub fn from_env() -> Self {
		let defaults = Self::default();

		let seed = env::var("FAULT_SEED")
			.ok()
			.and_then(|s| s.parse::<u64>().ok())
			.unwrap_or(defaults.seed);

		let max_faults = env::var("FAULT_MAX")
			.ok()
			.and_then(|s| s.parse::<usize>().ok())
			.unwrap_or(defaults.max_faults);

		let probability = env::var("FAULT_PROBABILITY")
			.ok()
			.and_then(|s| s.parse::<f64>().ok())
			.filter(|p| (0.0..=1.0).contains(p))
			.unwrap_or(defaults.probability);

		Self {
			seed,
			max_faults,
			probability,
		}
	}

	/// Builds an injector with these parameters.
	pub fn into_injector(self) -> FaultInjector {
		FaultInjector::new(self.seed, self.max_faults, self.probability)
	}
}
