// Copyright 2025 Irreducible Inc.
//! Dependency levels of wires and instructions.
//!
//! Every wire gets the level of the instruction that produces it. Circuit inputs have no
//! producer and sit at [`Level::BASE`]. An instruction is placed one level above the highest
//! wire it reads, so all instructions of one level are independent and levels can be solved one
//! after another. Instructions are only ever appended, hence the levels are computed
//! incrementally and never revisited.

use std::fmt;

use crate::instruction::InstructionId;

/// The dependency depth of a wire or an instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub u32);

impl Level {
	/// The level of every wire without a producer.
	pub const BASE: Level = Level(0);
	/// The lowest level an instruction can be placed on.
	pub const FIRST: Level = Level(1);

	/// The level right above this one.
	pub fn next(self) -> Level {
		Level(self.0 + 1)
	}

	/// The position of this level in [`InstructionTree::levels`].
	///
	/// # Panics
	/// Panics for [`Level::BASE`], which holds wires but never instructions.
	pub fn bucket(self) -> usize {
		assert!(self != Level::BASE, "the base level holds no instructions");
		(self.0 - 1) as usize
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "L{}", self.0)
	}
}

/// Levels of all wires plus the instructions of every level.
#[derive(Clone, Debug, Default)]
pub struct InstructionTree {
	/// Indexed by wire id. `None` for internal wires no instruction has produced yet.
	wire_levels: Vec<Option<Level>>,
	/// `levels[l.bucket()]` holds the instructions at level `l`, in append order.
	levels: Vec<Vec<InstructionId>>,
}

impl InstructionTree {
	/// Creates an empty tree.
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocates a wire without a producer, sitting at [`Level::BASE`].
	pub(crate) fn add_input_wire(&mut self) -> u32 {
		self.push_wire(Some(Level::BASE))
	}

	/// Allocates a wire that some later instruction is expected to produce.
	pub(crate) fn add_internal_wire(&mut self) -> u32 {
		self.push_wire(None)
	}

	fn push_wire(&mut self, level: Option<Level>) -> u32 {
		let wire = self.wire_levels.len() as u32;
		self.wire_levels.push(level);
		wire
	}

	/// Drops wires allocated past `n_wires`. Only used to undo a failed append.
	pub(crate) fn truncate_wires(&mut self, n_wires: usize) {
		self.wire_levels.truncate(n_wires);
	}

	/// The number of allocated wires.
	pub fn nb_wires(&self) -> usize {
		self.wire_levels.len()
	}

	/// Returns `true` if the wire is an input or has already been produced by an instruction.
	pub fn has_wire(&self, wire: u32) -> bool {
		matches!(self.wire_levels.get(wire as usize), Some(Some(_)))
	}

	/// The level of the wire, or `None` if it was not produced yet.
	pub fn wire_level(&self, wire: u32) -> Option<Level> {
		self.wire_levels.get(wire as usize).copied().flatten()
	}

	/// Assigns the level of a freshly produced wire.
	///
	/// # Panics
	/// Panics if the wire is unknown or already has a level: a wire has at most one producer.
	pub fn insert_wire(&mut self, wire: u32, level: Level) {
		let slot = self
			.wire_levels
			.get_mut(wire as usize)
			.unwrap_or_else(|| panic!("wire {wire} was never allocated"));
		assert!(slot.is_none(), "wire {wire} already has a producer at {slot:?}");
		*slot = Some(level);
	}

	/// Records an instruction at the given level.
	///
	/// Levels are computed as one above an existing level, so a new level is always the next
	/// one and appending is enough.
	pub(crate) fn push_instruction(&mut self, id: InstructionId, level: Level) {
		let bucket = level.bucket();
		assert!(bucket <= self.levels.len(), "level {level} skips a level");
		if bucket == self.levels.len() {
			self.levels.push(vec![id]);
		} else {
			self.levels[bucket].push(id);
		}
	}

	/// The instructions of every level, lowest level first.
	pub fn levels(&self) -> &[Vec<InstructionId>] {
		&self.levels
	}

	/// The highest level of any instruction, [`Level::BASE`] for an empty system.
	pub fn depth(&self) -> Level {
		Level(self.levels.len() as u32)
	}

	/// Computes the level of an instruction that reads `inputs`: one above the highest of them.
	///
	/// # Panics
	/// Panics if an input has not been produced yet. Reading a wire before its producer is a
	/// frontend bug that no schedule could satisfy.
	pub fn level_above(&self, inputs: impl IntoIterator<Item = u32>) -> Level {
		inputs
			.into_iter()
			.map(|wire| {
				self.wire_level(wire).unwrap_or_else(|| {
					panic!("wire {wire} is read before any instruction produces it")
				})
			})
			.max()
			.unwrap_or(Level::BASE)
			.next()
	}
}
