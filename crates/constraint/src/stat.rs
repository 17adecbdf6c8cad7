// Copyright 2025 Irreducible Inc.

//! Constraint system statistics: instruction mix, level shape and calldata footprint.

use std::fmt;

use cranelift_entity::EntityRef;
use tessera_core::Field;

use crate::system::System;

/// Various stats of a constraint system that affect solving performance and memory.
pub struct SystemStat {
	/// Number of instructions.
	pub n_instructions: usize,
	/// Number of constraints.
	pub n_constraints: usize,
	/// Number of wires, inputs included.
	pub n_wires: usize,
	/// Number of public input wires.
	pub n_public: usize,
	/// Number of secret input wires.
	pub n_secret: usize,
	/// Number of distinct coefficients, reserved ones included.
	pub n_coeffs: usize,
	/// Number of dependency levels.
	///
	/// Bounds the number of synchronization points of a parallel solve.
	pub n_levels: usize,
	/// Number of instructions in the widest level.
	pub max_level_width: usize,
	/// Total calldata words.
	pub calldata_words: usize,
	/// Instruction count per blueprint name, in blueprint registration order.
	///
	/// Blueprints without instructions are listed with a count of zero.
	pub per_blueprint: Vec<(&'static str, usize)>,
}

impl SystemStat {
	/// Creates a new `SystemStat` instance by collecting statistics from the given system.
	pub fn collect<F: Field>(system: &System<F>) -> Self {
		let mut per_blueprint = system
			.blueprints()
			.values()
			.map(|blueprint| (blueprint.name(), 0))
			.collect::<Vec<_>>();
		for inst in system.instructions() {
			per_blueprint[inst.blueprint_id.index()].1 += 1;
		}

		Self {
			n_instructions: system.nb_instructions(),
			n_constraints: system.nb_constraints(),
			n_wires: system.nb_wires(),
			n_public: system.public_inputs().len(),
			n_secret: system.secret_inputs().len(),
			n_coeffs: system.coeffs().len(),
			n_levels: system.levels().len(),
			max_level_width: system.levels().iter().map(Vec::len).max().unwrap_or(0),
			calldata_words: system.calldata().len(),
			per_blueprint,
		}
	}

	/// Average calldata words per instruction.
	pub fn words_per_instruction(&self) -> f64 {
		if self.n_instructions == 0 {
			0.0
		} else {
			self.calldata_words as f64 / self.n_instructions as f64
		}
	}
}

impl fmt::Display for SystemStat {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Helper to format numbers with commas
		fn fmt_num(n: usize) -> String {
			let s = n.to_string();
			let mut result = String::new();
			for (i, c) in s.chars().rev().enumerate() {
				if i > 0 && i % 3 == 0 {
					result.push(',');
				}
				result.push(c);
			}
			result.chars().rev().collect()
		}

		writeln!(f, "Instructions")?;
		writeln!(f, "├─ Number of instructions: {}", fmt_num(self.n_instructions))?;
		let glyph = if self.per_blueprint.is_empty() { "└─" } else { "├─" };
		writeln!(f, "{glyph} Number of constraints: {}", fmt_num(self.n_constraints))?;
		for (i, (name, count)) in self.per_blueprint.iter().enumerate() {
			let glyph = if i + 1 == self.per_blueprint.len() { "└─" } else { "├─" };
			writeln!(f, "{glyph} {name}: {}", fmt_num(*count))?;
		}
		writeln!(f)?;

		writeln!(f, "Levels")?;
		writeln!(f, "├─ Number of levels: {}", fmt_num(self.n_levels))?;
		writeln!(f, "└─ Widest level: {}", fmt_num(self.max_level_width))?;
		writeln!(f)?;

		writeln!(f, "Wires")?;
		writeln!(f, "├─ Total: {}", fmt_num(self.n_wires))?;
		writeln!(f, "├─ Public inputs: {}", fmt_num(self.n_public))?;
		writeln!(f, "└─ Secret inputs: {}", fmt_num(self.n_secret))?;
		writeln!(f)?;

		writeln!(f, "Calldata")?;
		writeln!(f, "├─ Words: {}", fmt_num(self.calldata_words))?;
		writeln!(f, "├─ Words per instruction: {:.2}", self.words_per_instruction())?;
		writeln!(f, "└─ Distinct coefficients: {}", fmt_num(self.n_coeffs))?;

		Ok(())
	}
}
