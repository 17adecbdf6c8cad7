// Copyright 2025 Irreducible Inc.
//! Call of an external hint function.
//!
//! Evaluates the input expressions, runs the hint registered under `hint_id` and writes its
//! results into a contiguous range of fresh wires.
//!
//! # Calldata
//!
//! Length prefixed, every input is a compressed linear expression:
//!
//! ```text
//! [len, hint_id, n_inputs, LE_0..., LE_1..., ..., out_start, out_end]
//! ```
//!
//! # Constraints
//!
//! None. The outputs must be constrained by other instructions.

use tessera_core::{
	CalldataError, CalldataReader, CalldataSize, Compressible, Field, HintMapping, WireRange,
	calldata::with_length_prefix,
};

use super::{calldata_error, read_expression};
use crate::{
	error::SolveError,
	hints::HintRegistry,
	instruction::Instruction,
	solver::Solver,
	tree::{InstructionTree, Level},
};

/// The blueprint, see the module documentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericHint;

impl GenericHint {
	/// The calldata size of every instruction.
	pub const CALLDATA_SIZE: CalldataSize = CalldataSize::Unknown;

	/// Appends the calldata of `h`.
	pub fn compress(&self, h: &HintMapping, to: &mut Vec<u32>) {
		with_length_prefix(to, |to| {
			to.push(h.hint_id);
			to.push(h.inputs.len() as u32);
			for input in &h.inputs {
				input.compress(to);
			}
			h.outputs.compress(to);
		});
	}

	/// Recovers the hint mapping of an instruction.
	pub fn decompress(&self, inst: &Instruction<'_>) -> Result<HintMapping, CalldataError> {
		let mut reader = CalldataReader::with_length_prefix(inst.calldata)?;
		let hint_id = reader.read_u32()?;
		let n_inputs = reader.read_len()?;
		let inputs = (0..n_inputs)
			.map(|_| reader.read_linear_expression())
			.collect::<Result<Vec<_>, _>>()?;
		let outputs = read_outputs(&mut reader)?;
		reader.finish()?;
		Ok(HintMapping {
			hint_id,
			inputs,
			outputs,
		})
	}

	/// The number of wires written by the hint.
	pub fn nb_outputs(&self, inst: &Instruction<'_>) -> Result<usize, CalldataError> {
		Ok(self.decompress(inst)?.outputs.len())
	}

	/// Places the call one level above its highest input and assigns that level to its outputs.
	///
	/// # Panics
	/// Panics if an input wire has not been produced yet.
	pub fn update_instruction_tree(
		&self,
		inst: &Instruction<'_>,
		tree: &mut InstructionTree,
	) -> Result<Level, CalldataError> {
		let h = self.decompress(inst)?;
		if h.outputs.start != inst.wire_offset {
			return Err(CalldataError::OutputsMisplaced {
				start: h.outputs.start,
				expected: inst.wire_offset,
			});
		}

		let level = tree.level_above(h.inputs.iter().flat_map(|input| input.wires()));
		for wire in h.outputs.iter() {
			tree.insert_wire(wire, level);
		}
		Ok(level)
	}

	/// Evaluates the inputs, runs the hint and writes its outputs.
	pub fn solve_with<F: Field, S: Solver<F>>(
		&self,
		solver: &mut S,
		inst: &Instruction<'_>,
		hints: &HintRegistry<F>,
	) -> Result<(), SolveError> {
		let mut reader =
			CalldataReader::with_length_prefix(inst.calldata).map_err(calldata_error(inst))?;
		let hint_id = reader.read_u32().map_err(calldata_error(inst))?;
		let n_inputs = reader.read_len().map_err(calldata_error(inst))?;
		let inputs = (0..n_inputs)
			.map(|_| read_expression(&*solver, &mut reader, inst))
			.collect::<Result<Vec<F>, _>>()?;
		let outputs = read_outputs(&mut reader).map_err(calldata_error(inst))?;
		reader.finish().map_err(calldata_error(inst))?;

		let hint = hints.get(hint_id).ok_or(SolveError::UnknownHint {
			instruction: inst.index(),
			hint_id,
		})?;
		let mut values = vec![F::ZERO; outputs.len()];
		hint.execute(&inputs, &mut values)
			.map_err(|source| SolveError::Hint {
				instruction: inst.index(),
				hint_id,
				source,
			})?;

		for (wire, value) in outputs.iter().zip(values) {
			solver.set_value(wire, value)?;
		}
		Ok(())
	}
}

fn read_outputs(reader: &mut CalldataReader<'_>) -> Result<WireRange, CalldataError> {
	let start = reader.read_u32()?;
	let end = reader.read_u32()?;
	if end < start {
		return Err(CalldataError::ReversedRange { start, end });
	}
	Ok(WireRange::new(start, end))
}
