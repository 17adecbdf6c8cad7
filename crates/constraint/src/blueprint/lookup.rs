// Copyright 2025 Irreducible Inc.
//! Table lookup.
//!
//! Evaluates a table of entries, then for every query evaluates an index and writes the entry at
//! that index into a fresh wire.
//!
//! # Calldata
//!
//! Length prefixed, entries and queries are compressed linear expressions:
//!
//! ```text
//! [len, n_entries, LE..., n_queries, LE...]
//! ```
//!
//! The i-th query writes wire `wire_offset + i`.
//!
//! # State
//!
//! The evaluated table is kept in the blueprint while an instruction is solved. Solving appends
//! to it, only [`Lookup::reset`] clears it. The solver runtime resets the blueprint before every
//! instruction.

use tessera_core::{
	CalldataError, CalldataReader, CalldataSize, Compressible, Field, LinearExpression,
	calldata::with_length_prefix, consts::TERM_WORDS,
};

use super::{calldata_error, read_expression, solve::unsolvable};
use crate::{
	error::SolveError,
	instruction::Instruction,
	solver::Solver,
	tree::{InstructionTree, Level},
};

/// The calldata size of every instruction.
pub const CALLDATA_SIZE: CalldataSize = CalldataSize::Unknown;

/// The blueprint, see the module documentation.
#[derive(Clone, Debug, Default)]
pub struct Lookup<F> {
	table: Vec<F>,
}

/// The compressed expressions of a lookup instruction, each slice starting with its term count.
struct LookupWords<'a> {
	entries: Vec<&'a [u32]>,
	queries: Vec<&'a [u32]>,
}

impl<'a> LookupWords<'a> {
	fn parse(calldata: &'a [u32]) -> Result<Self, CalldataError> {
		fn read_group<'a>(reader: &mut CalldataReader<'a>) -> Result<Vec<&'a [u32]>, CalldataError> {
			let n = reader.read_len()?;
			(0..n)
				.map(|_| reader.read_linear_expression_words())
				.collect()
		}

		let mut reader = CalldataReader::with_length_prefix(calldata)?;
		let entries = read_group(&mut reader)?;
		let queries = read_group(&mut reader)?;
		reader.finish()?;
		Ok(Self { entries, queries })
	}

	fn wires(&self) -> impl Iterator<Item = u32> + '_ {
		self.entries
			.iter()
			.chain(&self.queries)
			.flat_map(|words| words[1..].chunks_exact(TERM_WORDS).map(|pair| pair[1]))
	}
}

impl<F: Field> Lookup<F> {
	/// Creates the blueprint with an empty table.
	pub fn new() -> Self {
		Self { table: Vec::new() }
	}

	/// Appends the calldata of a lookup of `queries` into `entries`.
	pub fn compress(entries: &[LinearExpression], queries: &[LinearExpression], to: &mut Vec<u32>) {
		with_length_prefix(to, |to| {
			for group in [entries, queries] {
				to.push(group.len() as u32);
				for expr in group {
					expr.compress(to);
				}
			}
		});
	}

	/// Recovers the entries and queries of an instruction.
	pub fn decompress(
		&self,
		inst: &Instruction<'_>,
	) -> Result<(Vec<LinearExpression>, Vec<LinearExpression>), CalldataError> {
		let words = LookupWords::parse(inst.calldata)?;
		let decode = |group: &[&[u32]]| {
			group
				.iter()
				.map(|words| CalldataReader::new(words).read_linear_expression())
				.collect::<Result<Vec<_>, _>>()
		};
		Ok((decode(&words.entries)?, decode(&words.queries)?))
	}

	/// One output per query.
	pub fn nb_outputs(&self, inst: &Instruction<'_>) -> Result<usize, CalldataError> {
		Ok(LookupWords::parse(inst.calldata)?.queries.len())
	}

	/// Places the lookup one level above every wire it reads and assigns that level to its
	/// outputs.
	///
	/// # Panics
	/// Panics if an entry or a query reads a wire that has not been produced yet.
	pub fn update_instruction_tree(
		&self,
		inst: &Instruction<'_>,
		tree: &mut InstructionTree,
	) -> Result<Level, CalldataError> {
		let words = LookupWords::parse(inst.calldata)?;
		let level = tree.level_above(words.wires());
		for i in 0..words.queries.len() as u32 {
			tree.insert_wire(inst.wire_offset + i, level);
		}
		Ok(level)
	}

	/// See [`super::Blueprint::solve`].
	pub fn solve<S: Solver<F>>(
		&mut self,
		solver: &mut S,
		inst: &Instruction<'_>,
	) -> Result<(), SolveError> {
		let mut reader =
			CalldataReader::with_length_prefix(inst.calldata).map_err(calldata_error(inst))?;

		let n_entries = reader.read_len().map_err(calldata_error(inst))?;
		for _ in 0..n_entries {
			let entry = read_expression(&*solver, &mut reader, inst)?;
			self.table.push(entry);
		}

		let n_queries = reader.read_len().map_err(calldata_error(inst))?;
		let mut results = Vec::with_capacity(n_queries);
		for _ in 0..n_queries {
			let index = read_expression(&*solver, &mut reader, inst)?;
			let entry = index
				.try_to_u64()
				.and_then(|i| usize::try_from(i).ok())
				.and_then(|i| self.table.get(i))
				.ok_or_else(|| unsolvable(inst, "lookup index is outside of the table"))?;
			results.push(*entry);
		}
		reader.finish().map_err(calldata_error(inst))?;

		for (i, value) in results.into_iter().enumerate() {
			solver.set_value(inst.wire_offset + i as u32, value)?;
		}
		Ok(())
	}

	/// Clears the table.
	pub fn reset(&mut self) {
		self.table.clear();
	}

	/// The entries evaluated since the last reset.
	pub fn table(&self) -> &[F] {
		&self.table
	}
}
