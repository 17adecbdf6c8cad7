// Copyright 2025 Irreducible Inc.
//! The constraint system: blueprints, instructions, calldata and the instruction tree.

use cranelift_entity::PrimaryMap;
use tessera_core::{
	CalldataError, CalldataSize, CoeffTable, Field, HintMapping, LinearExpression, R1c, SparseR1c,
	WireRange, calldata::length_prefix,
};

use crate::{
	blueprint::{Blueprint, BlueprintId, PayloadKind},
	fault::FaultSource,
	hints::HintId,
	instruction::{Instruction, InstructionId, PackedInstruction},
	tree::{InstructionTree, Level},
};

/// What [`System::add_instruction`] reports about an appended instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Appended {
	/// Id of the instruction.
	pub id: InstructionId,
	/// The wires allocated for its outputs.
	pub outputs: WireRange,
	/// The level the instruction was placed on.
	pub level: Level,
}

/// A constraint system under construction and, once built, the input of a
/// [`crate::SolverRuntime`].
///
/// Instructions are only ever appended. Every instruction is compressed into the shared calldata
/// arena by its blueprint and placed on a dependency level right away.
#[derive(Clone, Debug)]
pub struct System<F: Field> {
	blueprints: PrimaryMap<BlueprintId, Blueprint<F>>,
	instructions: PrimaryMap<InstructionId, PackedInstruction>,
	calldata: Vec<u32>,
	coeffs: CoeffTable<F>,
	tree: InstructionTree,
	public_inputs: Vec<u32>,
	secret_inputs: Vec<u32>,
	n_constraints: usize,
}

impl<F: Field> Default for System<F> {
	fn default() -> Self {
		Self::new()
	}
}

impl<F: Field> System<F> {
	/// Creates an empty system.
	pub fn new() -> Self {
		Self {
			blueprints: PrimaryMap::new(),
			instructions: PrimaryMap::new(),
			calldata: Vec::new(),
			coeffs: CoeffTable::new(),
			tree: InstructionTree::new(),
			public_inputs: Vec::new(),
			secret_inputs: Vec::new(),
			n_constraints: 0,
		}
	}

	/// Registers a blueprint. Ids are handed out in registration order.
	pub fn add_blueprint(&mut self, blueprint: Blueprint<F>) -> BlueprintId {
		self.blueprints.push(blueprint)
	}

	/// Allocates a public input wire.
	pub fn add_public_input(&mut self) -> u32 {
		let wire = self.tree.add_input_wire();
		self.public_inputs.push(wire);
		wire
	}

	/// Allocates a secret input wire.
	pub fn add_secret_input(&mut self) -> u32 {
		let wire = self.tree.add_input_wire();
		self.secret_inputs.push(wire);
		wire
	}

	/// Allocates an internal wire that the next R1C-family instruction reading it will solve.
	pub fn add_internal_wire(&mut self) -> u32 {
		self.tree.add_internal_wire()
	}

	/// Returns the id of a coefficient, registering it if needed.
	pub fn add_coeff(&mut self, coeff: F) -> u32 {
		self.coeffs.insert(coeff)
	}

	/// Compresses `c` with `blueprint` and appends it.
	pub fn add_r1c(&mut self, blueprint: BlueprintId, c: &R1c) -> Result<Appended, CalldataError> {
		let mut words = Vec::new();
		self.blueprints[blueprint].compress_r1c(c, &mut words);
		self.add_instruction(blueprint, &words)
	}

	/// Compresses `c` with `blueprint` and appends it.
	pub fn add_sparse_r1c(
		&mut self,
		blueprint: BlueprintId,
		c: &SparseR1c,
	) -> Result<Appended, CalldataError> {
		let mut words = Vec::new();
		self.blueprints[blueprint].compress_sparse_r1c(c, &mut words);
		self.add_instruction(blueprint, &words)
	}

	/// Appends a call of hint `hint_id` that writes `n_outputs` fresh wires.
	pub fn add_hint(
		&mut self,
		blueprint: BlueprintId,
		hint_id: HintId,
		inputs: Vec<LinearExpression>,
		n_outputs: usize,
	) -> Result<Appended, CalldataError> {
		let start = self.tree.nb_wires() as u32;
		let end = u32::try_from(n_outputs)
			.ok()
			.and_then(|n| start.checked_add(n))
			.ok_or(CalldataError::WireOverflow {
				start,
				len: n_outputs,
			})?;
		let mapping = HintMapping {
			hint_id,
			inputs,
			outputs: WireRange::new(start, end),
		};
		let mut words = Vec::new();
		self.blueprints[blueprint].compress_hint(&mapping, &mut words);
		self.add_instruction(blueprint, &words)
	}

	/// Appends a lookup of every query into `entries`, writing one fresh wire per query.
	pub fn add_lookup(
		&mut self,
		blueprint: BlueprintId,
		entries: &[LinearExpression],
		queries: &[LinearExpression],
	) -> Result<Appended, CalldataError> {
		let mut words = Vec::new();
		self.blueprints[blueprint].compress_lookup(entries, queries, &mut words);
		self.add_instruction(blueprint, &words)
	}

	/// Appends an instruction given its calldata.
	///
	/// The calldata must have the size the blueprint expects and refer only to coefficients of
	/// [`Self::coeffs`]. On error the system is left as it was.
	///
	/// # Panics
	/// Panics if `blueprint` was not registered, or if the instruction reads a wire that was never
	/// allocated or, for hints and lookups, not produced yet.
	pub fn add_instruction(
		&mut self,
		blueprint_id: BlueprintId,
		calldata: &[u32],
	) -> Result<Appended, CalldataError> {
		let blueprint = &self.blueprints[blueprint_id];
		match blueprint.calldata_size() {
			CalldataSize::Fixed(expected) if expected != calldata.len() => {
				return Err(CalldataError::SizeMismatch {
					expected,
					actual: calldata.len(),
				});
			}
			CalldataSize::Fixed(_) => {}
			CalldataSize::Unknown => {
				let prefix = length_prefix(calldata)?;
				if prefix != calldata.len() {
					return Err(CalldataError::LengthMismatch {
						prefix,
						actual: calldata.len(),
					});
				}
			}
		}

		let id = self.instructions.next_key();
		let calldata_start = self.calldata.len();
		let wire_offset = self.tree.nb_wires();
		let inst = Instruction {
			id,
			blueprint_id,
			constraint_offset: self.n_constraints as u32,
			wire_offset: wire_offset as u32,
			calldata,
		};

		let n_coeffs = self.coeffs.len();
		if let Some(coeff_id) = blueprint
			.coeff_ids(&inst)?
			.into_iter()
			.find(|&id| id as usize >= n_coeffs)
		{
			return Err(CalldataError::UnknownCoeff {
				coeff_id,
				len: n_coeffs,
			});
		}

		let n_outputs = blueprint.nb_outputs(&inst)?;
		for _ in 0..n_outputs {
			self.tree.add_internal_wire();
		}
		let level = match blueprint.update_instruction_tree(&inst, &mut self.tree) {
			Ok(level) => level,
			Err(err) => {
				self.tree.truncate_wires(wire_offset);
				return Err(err);
			}
		};

		self.calldata.extend_from_slice(calldata);
		self.instructions.push(PackedInstruction {
			blueprint_id,
			constraint_offset: self.n_constraints as u32,
			wire_offset: wire_offset as u32,
			calldata_start: calldata_start as u64,
		});
		self.tree.push_instruction(id, level);
		self.n_constraints += blueprint.nb_constraints();

		Ok(Appended {
			id,
			outputs: WireRange::new(wire_offset as u32, (wire_offset + n_outputs) as u32),
			level,
		})
	}

	/// The registered blueprints.
	pub fn blueprints(&self) -> &PrimaryMap<BlueprintId, Blueprint<F>> {
		&self.blueprints
	}

	/// The blueprint registered under `id`.
	pub fn blueprint(&self, id: BlueprintId) -> &Blueprint<F> {
		&self.blueprints[id]
	}

	/// The coefficient table.
	pub fn coeffs(&self) -> &CoeffTable<F> {
		&self.coeffs
	}

	/// The shared calldata arena.
	pub fn calldata(&self) -> &[u32] {
		&self.calldata
	}

	/// The instruction tree.
	pub fn tree(&self) -> &InstructionTree {
		&self.tree
	}

	/// The instructions of every level, lowest level first.
	pub fn levels(&self) -> &[Vec<InstructionId>] {
		self.tree.levels()
	}

	/// The public input wires, in allocation order.
	pub fn public_inputs(&self) -> &[u32] {
		&self.public_inputs
	}

	/// The secret input wires, in allocation order.
	pub fn secret_inputs(&self) -> &[u32] {
		&self.secret_inputs
	}

	/// The number of instructions.
	pub fn nb_instructions(&self) -> usize {
		self.instructions.len()
	}

	/// The number of constraints over all instructions.
	pub fn nb_constraints(&self) -> usize {
		self.n_constraints
	}

	/// The number of wires, inputs included.
	pub fn nb_wires(&self) -> usize {
		self.tree.nb_wires()
	}

	/// The stored form of an instruction.
	pub fn packed(&self, id: InstructionId) -> &PackedInstruction {
		&self.instructions[id]
	}

	/// The unpacked view of an instruction.
	pub fn instruction(&self, id: InstructionId) -> Instruction<'_> {
		let packed = &self.instructions[id];
		let tail = &self.calldata[packed.calldata_start as usize..];
		let len = match self.blueprints[packed.blueprint_id].calldata_size() {
			CalldataSize::Fixed(n) => n,
			CalldataSize::Unknown => tail[0] as usize,
		};
		self.view(id, &tail[..len])
	}

	/// Resolves the calldata range of an instruction.
	///
	/// For blueprints with [`CalldataSize::Unknown`] the range length is read from the length
	/// prefix and adjusted by [`FaultSource::delta`]. A corrupted length that runs past the end of
	/// the arena is reported here; any other corrupted length disagrees with the prefix and is
	/// caught by the blueprint when it decodes the range.
	pub fn unpack(
		&self,
		id: InstructionId,
		faults: &impl FaultSource,
	) -> Result<Instruction<'_>, CalldataError> {
		let packed = &self.instructions[id];
		let start = packed.calldata_start as usize;
		let tail = &self.calldata[start..];
		let len = match self.blueprints[packed.blueprint_id].calldata_size() {
			CalldataSize::Fixed(n) => n,
			CalldataSize::Unknown => {
				let prefix = length_prefix(tail)? as i64;
				(prefix + faults.delta()).max(0) as usize
			}
		};
		let calldata = tail.get(..len).ok_or(CalldataError::OutOfBounds {
			offset: start,
			requested: len,
			len: tail.len(),
		})?;
		Ok(self.view(id, calldata))
	}

	fn view<'s>(&'s self, id: InstructionId, calldata: &'s [u32]) -> Instruction<'s> {
		let packed = &self.instructions[id];
		Instruction {
			id,
			blueprint_id: packed.blueprint_id,
			constraint_offset: packed.constraint_offset,
			wire_offset: packed.wire_offset,
			calldata,
		}
	}

	/// Iterates over all instructions in append order.
	pub fn instructions(&self) -> impl Iterator<Item = Instruction<'_>> + '_ {
		self.instructions.keys().map(|id| self.instruction(id))
	}

	/// Decodes every R1C of the system, in append order.
	pub fn decompress_r1cs(&self) -> impl Iterator<Item = Result<R1c, CalldataError>> + '_ {
		self.instructions().filter_map(|inst| {
			let blueprint = &self.blueprints[inst.blueprint_id];
			(blueprint.payload_kind() == PayloadKind::R1c)
				.then(|| blueprint.decompress_r1c(&inst))
		})
	}

	/// Decodes every sparse R1C of the system, in append order.
	pub fn decompress_sparse_r1cs(
		&self,
	) -> impl Iterator<Item = Result<SparseR1c, CalldataError>> + '_ {
		self.instructions().filter_map(|inst| {
			let blueprint = &self.blueprints[inst.blueprint_id];
			(blueprint.payload_kind() == PayloadKind::SparseR1c)
				.then(|| blueprint.decompress_sparse_r1c(&inst))
		})
	}

	/// Logs the shape of the system.
	pub fn finalize(&self) {
		tracing::debug!(
			n_instructions = self.instructions.len(),
			n_constraints = self.n_constraints,
			n_wires = self.nb_wires(),
			n_levels = self.levels().len(),
			calldata_words = self.calldata.len(),
			"constraint system finalized"
		);
	}
}
