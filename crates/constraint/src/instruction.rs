// Copyright 2025 Irreducible Inc.
//! Instructions: the append-only units of work of a constraint system.

use cranelift_entity::{EntityRef, entity_impl};

use crate::blueprint::BlueprintId;

/// Identifies an instruction by its position in the system, i.e. by append order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct InstructionId(u32);
entity_impl!(InstructionId);

/// The stored form of an instruction.
///
/// It does not hold its calldata, only where the calldata starts in the calldata arena of the
/// system. The end is implied by the blueprint: either a fixed size or the length prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedInstruction {
	/// The blueprint that compressed this instruction.
	pub blueprint_id: BlueprintId,
	/// The number of constraints contributed by all previous instructions.
	pub constraint_offset: u32,
	/// The first wire allocated for the outputs of this instruction.
	pub wire_offset: u32,
	/// Start of the calldata range of this instruction.
	pub calldata_start: u64,
}

/// An unpacked view of an instruction, with its calldata range resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction<'a> {
	/// The position of this instruction in the system.
	pub id: InstructionId,
	/// The blueprint that compressed this instruction.
	pub blueprint_id: BlueprintId,
	/// The number of constraints contributed by all previous instructions.
	pub constraint_offset: u32,
	/// The first wire allocated for the outputs of this instruction.
	pub wire_offset: u32,
	/// Exactly the calldata words owned by this instruction.
	pub calldata: &'a [u32],
}

impl Instruction<'_> {
	/// The index of this instruction, handy for error reporting.
	pub fn index(&self) -> usize {
		self.id.index()
	}
}
