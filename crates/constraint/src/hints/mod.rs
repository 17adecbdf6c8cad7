// Copyright 2025 Irreducible Inc.
//! Hint system.
//!
//! Hints are deterministic computations that happen on the prover side, outside of the
//! constraint system. A hint instruction evaluates its input expressions, hands them to the
//! registered function and writes whatever it returns into its output wires. The values still
//! have to be constrained by other instructions.

use std::{fmt, sync::Arc};

use tessera_core::Field;

mod div;
mod inverse;

pub use div::DivHint;
pub use inverse::InverseHint;

/// Identifies a hint function in a [`HintRegistry`].
pub type HintId = u32;

/// Error reported by a hint function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HintError(pub String);

impl HintError {
	/// Creates an error from a message.
	pub fn new(msg: impl Into<String>) -> Self {
		Self(msg.into())
	}

	/// The error for a call with the wrong number of inputs or outputs.
	pub fn arity(name: &str, expected: (usize, usize), actual: (usize, usize)) -> Self {
		Self(format!(
			"{name} takes {} inputs and {} outputs, called with {} and {}",
			expected.0, expected.1, actual.0, actual.1
		))
	}
}

/// Hint handler trait for extensible operations
pub trait Hint<F: Field>: Send + Sync {
	/// Execute the hint with given inputs, writing outputs
	fn execute(&self, inputs: &[F], outputs: &mut [F]) -> Result<(), HintError>;
}

/// Registry for hint handlers
///
/// Cloning is cheap, handlers are shared.
#[derive(Clone)]
pub struct HintRegistry<F: Field> {
	handlers: Vec<Arc<dyn Hint<F>>>,
}

impl<F: Field> HintRegistry<F> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			handlers: Vec::new(),
		}
	}

	/// A registry holding [`InverseHint`] and [`DivHint`], with the ids returned by
	/// [`Self::register`] in that order.
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register(Box::new(InverseHint));
		registry.register(Box::new(DivHint));
		registry
	}

	/// Registers a handler and returns its id. Ids are handed out in registration order.
	pub fn register(&mut self, handler: Box<dyn Hint<F>>) -> HintId {
		let id = self.handlers.len() as HintId;
		self.handlers.push(Arc::from(handler));
		id
	}

	/// The handler registered under `hint_id`.
	pub fn get(&self, hint_id: HintId) -> Option<&dyn Hint<F>> {
		self.handlers.get(hint_id as usize).map(|h| h.as_ref())
	}

	/// The number of registered handlers.
	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	/// Returns `true` if no handler is registered.
	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

impl<F: Field> Default for HintRegistry<F> {
	fn default() -> Self {
		Self::new()
	}
}

impl<F: Field> fmt::Debug for HintRegistry<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HintRegistry")
			.field("n_handlers", &self.handlers.len())
			.finish()
	}
}
