// Copyright 2025 Irreducible Inc.
use cranelift_entity::{EntityRef, PrimaryMap};
use rayon::prelude::*;
use tessera_core::Field;

use super::{DirectSolver, LevelSolver, Solution, Solver, WireValues};
use crate::{
	blueprint::{Blueprint, BlueprintId, PayloadKind, calldata_error, solve::check_sparse_r1c},
	config::SolverConfig,
	error::SolveError,
	fault::{FaultSource, NoFaults},
	hints::HintRegistry,
	instruction::InstructionId,
	system::System,
};

type Blueprints<F> = PrimaryMap<BlueprintId, Blueprint<F>>;

/// Solves a [`System`] level by level.
///
/// The runtime borrows the system and the hint registry and can be reused for any number of
/// input assignments. Calldata faults are drawn from `D`, which is [`NoFaults`] unless
/// [`Self::with_faults`] is used.
pub struct SolverRuntime<'a, F: Field, D: FaultSource = NoFaults> {
	system: &'a System<F>,
	hints: &'a HintRegistry<F>,
	config: SolverConfig,
	faults: D,
}

impl<'a, F: Field> SolverRuntime<'a, F> {
	/// Creates a runtime without fault injection.
	pub fn new(system: &'a System<F>, hints: &'a HintRegistry<F>, config: SolverConfig) -> Self {
		Self {
			system,
			hints,
			config,
			faults: NoFaults,
		}
	}
}

impl<'a, F: Field, D: FaultSource> SolverRuntime<'a, F, D> {
	/// Replaces the fault source.
	pub fn with_faults<D2: FaultSource>(self, faults: D2) -> SolverRuntime<'a, F, D2> {
		SolverRuntime {
			system: self.system,
			hints: self.hints,
			config: self.config,
			faults,
		}
	}

	/// The fault source.
	pub fn faults(&self) -> &D {
		&self.faults
	}

	/// Assigns the inputs and solves every level.
	///
	/// `public` and `secret` are matched to the public and secret input wires in allocation
	/// order. Fails on the first instruction that cannot be solved; within a level solved in
	/// parallel the error of the lowest instruction is reported.
	pub fn solve(&self, public: &[F], secret: &[F]) -> Result<Solution<F>, SolveError> {
		let system = self.system;
		let levels = system.levels();
		let _scope = tracing::debug_span!(
			"Solve",
			n_levels = levels.len(),
			n_instructions = system.nb_instructions(),
		)
		.entered();

		let mut wires = WireValues::new(system.nb_wires());
		for (kind, wires_of_kind, values) in [
			("public", system.public_inputs(), public),
			("secret", system.secret_inputs(), secret),
		] {
			if wires_of_kind.len() != values.len() {
				return Err(SolveError::InputCountMismatch {
					kind,
					expected: wires_of_kind.len(),
					actual: values.len(),
				});
			}
			for (&wire, &value) in wires_of_kind.iter().zip(values) {
				wires.set(wire, value)?;
			}
		}

		let mut blueprints = system.blueprints().clone();

		for (i, level) in levels.iter().enumerate() {
			let _scope = tracing::trace_span!("Solve level", level = i + 1, width = level.len())
				.entered();

			if self.config.parallel && level.len() >= self.config.min_parallel_width {
				self.solve_level_parallel(&blueprints, &mut wires, level)?;
			} else {
				let mut solver = DirectSolver::new(system.coeffs(), &mut wires);
				for &id in level {
					self.solve_instruction(&mut blueprints, &mut solver, id)?;
				}
			}
		}

		wires.into_solution()
	}

	fn solve_level_parallel(
		&self,
		blueprints: &Blueprints<F>,
		wires: &mut WireValues<F>,
		level: &[InstructionId],
	) -> Result<(), SolveError> {
		let committed = &*wires;
		let results = level
			.par_iter()
			.map_init(
				|| blueprints.clone(),
				|blueprints, &id| {
					let mut solver = LevelSolver::new(self.system.coeffs(), committed);
					self.solve_instruction(blueprints, &mut solver, id)
						.map(|()| solver.into_pending())
				},
			)
			.collect::<Vec<_>>();

		// Commit in instruction order so that both the first error and conflicting writes are
		// reported deterministically.
		let mut buffers = Vec::with_capacity(results.len());
		for result in results {
			buffers.push(result?);
		}
		for pending in buffers {
			LevelSolver::commit(pending, wires)?;
		}
		Ok(())
	}

	fn solve_instruction<S: Solver<F>>(
		&self,
		blueprints: &mut Blueprints<F>,
		solver: &mut S,
		id: InstructionId,
	) -> Result<(), SolveError> {
		let inst = self
			.system
			.unpack(id, &self.faults)
			.map_err(|source| SolveError::Calldata {
				instruction: id.index(),
				source,
			})?;
		let blueprint = &mut blueprints[inst.blueprint_id];
		if blueprint.is_stateful() {
			blueprint.reset();
		}
		if blueprint.is_solvable() {
			return blueprint.solve(solver, &inst);
		}
		match blueprint.payload_kind() {
			PayloadKind::Hint => blueprint.solve_hint(solver, &inst, self.hints),
			PayloadKind::SparseR1c => {
				let c = blueprint
					.decompress_sparse_r1c(&inst)
					.map_err(calldata_error(&inst))?;
				check_sparse_r1c(&*solver, &inst, &c)
			}
			kind => unreachable!(
				"blueprint {} with payload {kind:?} is neither solvable nor checked",
				blueprint.name()
			),
		}
	}
}
