// Copyright 2025 Irreducible Inc.
//! Field inversion hint.

use tessera_core::Field;

use super::{Hint, HintError};

/// Returns `1 / x`, or `0` for `x = 0`.
///
/// The zero case lets circuits compute an is-zero flag `1 - x⋅inv(x)` without a branch.
#[derive(Clone, Copy, Debug, Default)]
pub struct InverseHint;

impl<F: Field> Hint<F> for InverseHint {
	fn execute(&self, inputs: &[F], outputs: &mut [F]) -> Result<(), HintError> {
		let arity = (inputs.len(), outputs.len());
		let ([x], [out]) = (inputs, outputs) else {
			return Err(HintError::arity("inverse", (1, 1), arity));
		};
		*out = x.invert().unwrap_or(F::ZERO);
		Ok(())
	}
}
