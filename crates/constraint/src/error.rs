// Copyright 2025 Irreducible Inc.
//! Hosts error definitions for the constraint crate.

use tessera_core::CalldataError;

use crate::hints::HintError;

/// Error produced while solving a constraint system.
#[allow(missing_docs)] // errors are self-documenting
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
	#[error("instruction #{instruction} has no consistent assignment: {reason}")]
	UnsolvableConstraint {
		instruction: usize,
		reason: &'static str,
	},
	#[error("wire {wire} is already solved with a different value")]
	ConsistencyViolation { wire: u32 },
	#[error("expected {expected} {kind} input values, got {actual}")]
	InputCountMismatch {
		kind: &'static str,
		expected: usize,
		actual: usize,
	},
	#[error("instruction #{instruction} calls hint {hint_id}, which is not registered")]
	UnknownHint { instruction: usize, hint_id: u32 },
	#[error("hint {hint_id} failed in instruction #{instruction}")]
	Hint {
		instruction: usize,
		hint_id: u32,
		#[source]
		source: HintError,
	},
	#[error("instruction #{instruction} has malformed calldata")]
	Calldata {
		instruction: usize,
		#[source]
		source: CalldataError,
	},
	#[error("{count} wires are still unsolved after the last level, first one is {first}")]
	UnsolvedWires { count: usize, first: u32 },
}
