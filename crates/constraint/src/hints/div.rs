// Copyright 2025 Irreducible Inc.
//! Field division hint.

use tessera_core::Field;

use super::{Hint, HintError};

/// Returns `a / b`. Fails for `b = 0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DivHint;

impl<F: Field> Hint<F> for DivHint {
	fn execute(&self, inputs: &[F], outputs: &mut [F]) -> Result<(), HintError> {
		let arity = (inputs.len(), outputs.len());
		let ([a, b], [out]) = (inputs, outputs) else {
			return Err(HintError::arity("div", (2, 1), arity));
		};
		let inv = b
			.invert()
			.ok_or_else(|| HintError::new("division by zero"))?;
		*out = *a * inv;
		Ok(())
	}
}
