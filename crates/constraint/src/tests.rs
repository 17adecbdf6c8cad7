// Copyright 2025 Irreducible Inc.
use cranelift_entity::EntityRef;
use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tessera_core::{
	CalldataError, CalldataSize, Field, Goldilocks, HintMapping, LinearExpression, R1c, SparseR1c,
	Term, WireRange,
	consts::{COEFF_ID_MINUS_ONE, COEFF_ID_ONE, COEFF_ID_TWO, COEFF_ID_ZERO},
};

use crate::{
	Blueprint, BlueprintId, FaultInjector, HintRegistry, Instruction, InstructionId, Level,
	PayloadKind, SolveError, Solver, SolverConfig, SolverRuntime, System,
	hints::InverseHint,
	solver::{DirectSolver, WireValues},
};

type G = Goldilocks;

const INVERSE: u32 = 0;
const DIV: u32 = 1;

struct Blueprints {
	r1c: BlueprintId,
	sparse: BlueprintId,
	mul: BlueprintId,
	add: BlueprintId,
	bool_: BlueprintId,
	hint: BlueprintId,
	lookup: BlueprintId,
}

fn system_with_blueprints() -> (System<G>, Blueprints) {
	let mut system = System::new();
	let bps = Blueprints {
		r1c: system.add_blueprint(Blueprint::generic_r1c()),
		sparse: system.add_blueprint(Blueprint::generic_sparse_r1c()),
		mul: system.add_blueprint(Blueprint::sparse_r1c_mul()),
		add: system.add_blueprint(Blueprint::sparse_r1c_add()),
		bool_: system.add_blueprint(Blueprint::sparse_r1c_bool()),
		hint: system.add_blueprint(Blueprint::generic_hint()),
		lookup: system.add_blueprint(Blueprint::lookup()),
	};
	(system, bps)
}

fn mul(xa: u32, xb: u32, xc: u32) -> SparseR1c {
	SparseR1c {
		xa,
		xb,
		xc,
		ql: COEFF_ID_ZERO,
		qr: COEFF_ID_ZERO,
		qo: COEFF_ID_MINUS_ONE,
		qm: COEFF_ID_ONE,
		qc: COEFF_ID_ZERO,
	}
}

fn add(xa: u32, xb: u32, xc: u32, ql: u32, qr: u32) -> SparseR1c {
	SparseR1c {
		xa,
		xb,
		xc,
		ql,
		qr,
		qo: COEFF_ID_MINUS_ONE,
		qm: COEFF_ID_ZERO,
		qc: COEFF_ID_ZERO,
	}
}

fn wire(w: u32) -> LinearExpression {
	Term::new(COEFF_ID_ONE, w).into()
}

fn view(calldata: &[u32]) -> Instruction<'_> {
	Instruction {
		id: InstructionId::new(0),
		blueprint_id: BlueprintId::new(0),
		constraint_offset: 0,
		wire_offset: 0,
		calldata,
	}
}

fn solve_with(
	system: &System<G>,
	config: SolverConfig,
	public: &[G],
	secret: &[G],
) -> Result<crate::Solution<G>, SolveError> {
	let hints = HintRegistry::with_builtins();
	SolverRuntime::new(system, &hints, config).solve(public, secret)
}

#[test]
fn test_scenario_mul_solves_product() {
	let (mut system, bps) = system_with_blueprints();
	let a = system.add_public_input();
	let b = system.add_secret_input();
	let c = system.add_internal_wire();
	let appended = system.add_sparse_r1c(bps.mul, &mul(a, b, c)).unwrap();
	assert_eq!(appended.level, Level::FIRST);
	assert!(appended.outputs.is_empty());
	assert_eq!(system.tree().wire_level(c), Some(Level::FIRST));

	let solution =
		solve_with(&system, SolverConfig::sequential(), &[G::new(6)], &[G::new(7)]).unwrap();
	assert_eq!(solution.get(c), G::new(42));

	// Solving again against a state where `c` is already set is a no-op.
	let mut wires = WireValues::new(system.nb_wires());
	for (w, v) in [(a, 6), (b, 7)] {
		wires.set(w, G::new(v)).unwrap();
	}
	let mut blueprint = system.blueprint(bps.mul).clone();
	let inst = system.instruction(appended.id);
	let mut solver = DirectSolver::new(system.coeffs(), &mut wires);
	blueprint.solve(&mut solver, &inst).unwrap();
	blueprint.solve(&mut solver, &inst).unwrap();
	assert!(solver.is_solved(c));
	assert_eq!(solver.get_value(COEFF_ID_TWO, c), G::new(84));
}

#[test]
fn test_scenario_variadic_hint_calldata() {
	let (mut system, bps) = system_with_blueprints();
	let inputs = (0..3).map(|_| system.add_public_input()).collect::<Vec<_>>();
	assert_eq!(system.blueprint(bps.hint).calldata_size(), CalldataSize::Unknown);

	let mut last = None;
	for _ in 0..3 {
		let start = system.calldata().len();
		let appended = system
			.add_hint(bps.hint, DIV, inputs.iter().map(|&w| wire(w)).collect(), 1)
			.unwrap();
		let inst = system.instruction(appended.id);
		assert_eq!(inst.calldata.as_ptr(), system.calldata()[start..].as_ptr());
		assert_eq!(inst.calldata[0] as usize, system.calldata().len() - start);
		assert_eq!(system.blueprint(bps.hint).nb_outputs(&inst), Ok(1));
		assert_eq!(appended.outputs.len(), 1);
		last = Some(appended);
	}

	let h = system
		.blueprint(bps.hint)
		.decompress_hint(&system.instruction(last.unwrap().id))
		.unwrap();
	assert_eq!(h.hint_id, DIV);
	assert_eq!(h.inputs.len(), 3);
	assert_eq!(h.outputs, last.unwrap().outputs);
}

fn disjoint_pair(swap: bool) -> (System<G>, [u32; 6]) {
	let (mut system, bps) = system_with_blueprints();
	let wires = [
		system.add_public_input(),
		system.add_public_input(),
		system.add_internal_wire(),
		system.add_public_input(),
		system.add_public_input(),
		system.add_internal_wire(),
	];
	let [a, b, c, d, e, f] = wires;
	let mut pair = [mul(a, b, c), add(d, e, f, COEFF_ID_TWO, COEFF_ID_MINUS_ONE)];
	if swap {
		pair.swap(0, 1);
	}
	for c in &pair {
		let bp = if c.qm == COEFF_ID_ONE { bps.mul } else { bps.add };
		let appended = system.add_sparse_r1c(bp, c).unwrap();
		assert_eq!(appended.level, Level::FIRST);
	}
	(system, wires)
}

#[test]
fn test_scenario_independent_instructions_commute() {
	let public = [3, 5, 11, 4].map(G::new);
	let parallel = SolverConfig {
		parallel: true,
		min_parallel_width: 1,
	};

	let mut results = Vec::new();
	for swap in [false, true] {
		let (system, wires) = disjoint_pair(swap);
		assert_eq!(system.levels().len(), 1);
		for config in [SolverConfig::sequential(), parallel.clone()] {
			let solution = solve_with(&system, config, &public, &[]).unwrap();
			results.push(wires.map(|w| solution.get(w)));
		}
	}
	assert_eq!(results[0][2], G::new(15));
	assert_eq!(results[0][5], G::new(18));
	assert!(results.iter().all(|r| r == &results[0]));
}

#[test]
fn test_roundtrip_generic_r1c() {
	let bp = Blueprint::<G>::generic_r1c();
	let c = R1c {
		l: LinearExpression::new(vec![Term::new(7, 1), Term::new(COEFF_ID_ONE, 2)]),
		r: LinearExpression::default(),
		o: wire(9),
	};
	let mut words = vec![];
	bp.compress_r1c(&c, &mut words);
	assert_eq!(words[0] as usize, words.len());
	assert_eq!(bp.decompress_r1c(&view(&words)), Ok(c));
}

#[test]
fn test_roundtrip_sparse_shapes() {
	let generic = SparseR1c {
		xa: 1,
		xb: 2,
		xc: 3,
		ql: 5,
		qr: 6,
		qo: 7,
		qm: 8,
		qc: 9,
	};
	let boolean = SparseR1c {
		xa: 4,
		xb: 4,
		xc: 4,
		ql: COEFF_ID_MINUS_ONE,
		qr: COEFF_ID_ZERO,
		qo: COEFF_ID_ZERO,
		qm: COEFF_ID_ONE,
		qc: COEFF_ID_ZERO,
	};
	let cases = [
		(Blueprint::<G>::generic_sparse_r1c(), generic),
		(Blueprint::sparse_r1c_mul(), mul(1, 2, 3)),
		(Blueprint::sparse_r1c_add(), add(1, 2, 3, 10, 11)),
		(Blueprint::sparse_r1c_bool(), boolean),
	];
	for (bp, c) in cases {
		let mut words = vec![];
		bp.compress_sparse_r1c(&c, &mut words);
		assert_eq!(Some(words.len()), bp.calldata_size().fixed(), "{}", bp.name());
		assert_eq!(bp.decompress_sparse_r1c(&view(&words)), Ok(c), "{}", bp.name());
	}
}

#[test]
fn test_fixed_size_rejects_wrong_length() {
	let (mut system, bps) = system_with_blueprints();
	let before = system.nb_wires();
	assert_eq!(
		system.add_instruction(bps.mul, &[0, 0, 0]),
		Err(CalldataError::SizeMismatch {
			expected: 4,
			actual: 3
		})
	);
	assert_eq!(
		system.add_instruction(bps.hint, &[7, 0]),
		Err(CalldataError::LengthMismatch {
			prefix: 7,
			actual: 2
		})
	);
	assert_eq!(system.nb_instructions(), 0);
	assert_eq!(system.nb_wires(), before);
	assert!(system.calldata().is_empty());
}

#[test]
fn test_misplaced_hint_outputs_are_rejected() {
	let (mut system, bps) = system_with_blueprints();
	let x = system.add_public_input();
	let mapping = HintMapping {
		hint_id: INVERSE,
		inputs: vec![wire(x)],
		outputs: WireRange::new(5, 6),
	};
	let mut words = vec![];
	system.blueprint(bps.hint).compress_hint(&mapping, &mut words);
	assert_eq!(
		system.add_instruction(bps.hint, &words),
		Err(CalldataError::OutputsMisplaced {
			start: 5,
			expected: 1
		})
	);
	assert_eq!(system.nb_wires(), 1);
}

#[test]
fn test_capabilities() {
	let (system, bps) = system_with_blueprints();
	let bp = |id| system.blueprint(id);
	assert!(bp(bps.r1c).is_solvable());
	assert!(!bp(bps.bool_).is_solvable());
	assert!(!bp(bps.hint).is_solvable());
	assert!(bp(bps.lookup).is_stateful());
	assert!(!bp(bps.sparse).is_stateful());
	assert_eq!(bp(bps.hint).payload_kind(), PayloadKind::Hint);
	assert_eq!(bp(bps.add).payload_kind(), PayloadKind::SparseR1c);
	assert_eq!(bp(bps.lookup).nb_constraints(), 0);
	assert_eq!(bp(bps.r1c).nb_constraints(), 1);
}

#[test]
#[should_panic(expected = "sparse_r1c_mul does not encode R1C")]
fn test_unsupported_capability_panics() {
	let bp = Blueprint::<G>::sparse_r1c_mul();
	bp.compress_r1c(&R1c::default(), &mut vec![]);
}

#[test]
#[should_panic(expected = "not stateful")]
fn test_reset_stateless_panics() {
	Blueprint::<G>::generic_hint().reset();
}

#[test]
fn test_r1c_solves_unknown_in_any_position() {
	let (mut system, bps) = system_with_blueprints();
	let b = system.add_public_input();
	let c = system.add_public_input();
	let x = system.add_internal_wire();
	let y = system.add_internal_wire();

	// x⋅b = c
	system
		.add_r1c(
			bps.r1c,
			&R1c {
				l: wire(x),
				r: wire(b),
				o: wire(c),
			},
		)
		.unwrap();
	// (x + b)⋅2 = y
	let appended = system
		.add_r1c(
			bps.r1c,
			&R1c {
				l: LinearExpression::new(vec![
					Term::new(COEFF_ID_ONE, x),
					Term::new(COEFF_ID_ONE, b),
				]),
				r: Term::new(COEFF_ID_TWO, b).into(),
				o: wire(y),
			},
		)
		.unwrap();
	assert_eq!(appended.level, Level(2));
	assert_eq!(system.nb_constraints(), 2);

	let solution =
		solve_with(&system, SolverConfig::default(), &[G::new(4), G::new(20)], &[]).unwrap();
	assert_eq!(solution.get(x), G::new(5));
	assert_eq!(solution.get(y), G::new(72));
}

#[test]
fn test_r1c_zero_divisor_is_unsolvable() {
	let (mut system, bps) = system_with_blueprints();
	let b = system.add_public_input();
	let c = system.add_public_input();
	let x = system.add_internal_wire();
	system
		.add_r1c(
			bps.r1c,
			&R1c {
				l: wire(x),
				r: wire(b),
				o: wire(c),
			},
		)
		.unwrap();

	let err = solve_with(&system, SolverConfig::default(), &[G::ZERO, G::ONE], &[]).unwrap_err();
	assert!(matches!(err, SolveError::UnsolvableConstraint { instruction: 0, .. }), "{err}");
}

#[test]
fn test_violated_constraint_is_reported() {
	let (mut system, bps) = system_with_blueprints();
	let a = system.add_public_input();
	let b = system.add_public_input();
	let c = system.add_public_input();
	system.add_sparse_r1c(bps.mul, &mul(a, b, c)).unwrap();

	let public = [2, 3, 6].map(G::new);
	solve_with(&system, SolverConfig::default(), &public, &[]).unwrap();

	let public = [2, 3, 7].map(G::new);
	let err = solve_with(&system, SolverConfig::default(), &public, &[]).unwrap_err();
	assert!(matches!(err, SolveError::UnsolvableConstraint { .. }));
}

#[test]
fn test_bool_constraint_is_checked() {
	let (mut system, bps) = system_with_blueprints();
	let x = system.add_secret_input();
	let boolean = SparseR1c {
		xa: x,
		xb: x,
		xc: x,
		ql: COEFF_ID_MINUS_ONE,
		qm: COEFF_ID_ONE,
		..SparseR1c::default()
	};
	system.add_sparse_r1c(bps.bool_, &boolean).unwrap();

	for (value, ok) in [(0, true), (1, true), (2, false)] {
		let result = solve_with(&system, SolverConfig::default(), &[], &[G::new(value)]);
		assert_eq!(result.is_ok(), ok, "x = {value}");
	}
}

#[test]
fn test_hint_errors() {
	let (mut system, bps) = system_with_blueprints();
	let a = system.add_public_input();
	let b = system.add_public_input();
	system
		.add_hint(bps.hint, DIV, vec![wire(a), wire(b)], 1)
		.unwrap();
	system.add_hint(bps.hint, 99, vec![wire(a)], 1).unwrap();

	let err = solve_with(&system, SolverConfig::default(), &[G::ONE, G::ZERO], &[]).unwrap_err();
	assert!(matches!(err, SolveError::Hint { instruction: 0, hint_id: DIV, .. }), "{err}");

	let err = solve_with(&system, SolverConfig::default(), &[G::ONE, G::ONE], &[]).unwrap_err();
	assert!(matches!(err, SolveError::UnknownHint { instruction: 1, hint_id: 99 }), "{err}");
}

#[test]
fn test_input_count_and_unsolved_wires() {
	let (mut system, _) = system_with_blueprints();
	system.add_public_input();
	let dangling = system.add_internal_wire();

	let err = solve_with(&system, SolverConfig::default(), &[], &[]).unwrap_err();
	assert!(matches!(
		err,
		SolveError::InputCountMismatch {
			kind: "public",
			expected: 1,
			actual: 0
		}
	));

	let err = solve_with(&system, SolverConfig::default(), &[G::ONE], &[]).unwrap_err();
	assert!(matches!(err, SolveError::UnsolvedWires { count: 1, first } if first == dangling));
}

#[test]
fn test_lookup_has_no_residue() {
	let (mut system, bps) = system_with_blueprints();
	let table_a = (0..4).map(|_| system.add_public_input()).collect::<Vec<_>>();
	let table_b = (0..2).map(|_| system.add_public_input()).collect::<Vec<_>>();
	let index = system.add_secret_input();

	let entries = |table: &[u32]| table.iter().map(|&w| wire(w)).collect::<Vec<_>>();
	let a = system
		.add_lookup(bps.lookup, &entries(&table_a), &[wire(index)])
		.unwrap();
	let b = system
		.add_lookup(bps.lookup, &entries(&table_b), &[wire(index), LinearExpression::default()])
		.unwrap();
	assert_eq!(a.level, b.level);
	assert_eq!(b.outputs.len(), 2);

	let public = [10, 11, 12, 13, 20, 21].map(G::new);
	let parallel = SolverConfig {
		parallel: true,
		min_parallel_width: 2,
	};
	for config in [SolverConfig::sequential(), parallel] {
		let solution = solve_with(&system, config, &public, &[G::ONE]).unwrap();
		assert_eq!(solution.get(a.outputs.start), G::new(11));
		assert_eq!(solution.get(b.outputs.start), G::new(21));
		assert_eq!(solution.get(b.outputs.start + 1), G::new(20));
	}

	// Index 3 exists in the first table only.
	let err = solve_with(&system, SolverConfig::sequential(), &public, &[G::new(3)]).unwrap_err();
	assert!(matches!(err, SolveError::UnsolvableConstraint { instruction: 1, .. }), "{err}");
}

#[test]
fn test_lookup_roundtrip() {
	let bp = Blueprint::<G>::lookup();
	let entries = vec![wire(1), LinearExpression::default(), Term::new(9, 2).into()];
	let queries = vec![wire(3)];
	let mut words = vec![];
	bp.compress_lookup(&entries, &queries, &mut words);
	let Blueprint::Lookup(lookup) = &bp else {
		unreachable!()
	};
	assert_eq!(lookup.decompress(&view(&words)), Ok((entries, queries)));
	assert_eq!(lookup.nb_outputs(&view(&words)), Ok(1));
}

#[test]
fn test_injected_fault_is_rejected() {
	let (mut system, bps) = system_with_blueprints();
	let x = system.add_public_input();
	let inv = system
		.add_hint(bps.hint, INVERSE, vec![wire(x)], 1)
		.unwrap()
		.outputs
		.start;
	let one = system.add_internal_wire();
	system.add_sparse_r1c(bps.mul, &mul(x, inv, one)).unwrap();

	let hints = HintRegistry::with_builtins();
	let runtime = SolverRuntime::new(&system, &hints, SolverConfig::default());
	let solution = runtime.solve(&[G::new(9)], &[]).unwrap();
	assert_eq!(solution.get(one), G::ONE);

	for seed in 0..8 {
		let runtime = runtime_with_fault(&system, &hints, seed);
		let err = runtime.solve(&[G::new(9)], &[]).unwrap_err();
		assert!(
			matches!(
				err,
				SolveError::Calldata {
					instruction: 0,
					source: CalldataError::LengthMismatch { .. }
				}
			),
			"{err}"
		);
		assert_eq!(runtime.faults().num_faults(), 1);
		assert_eq!(runtime.faults().num_calls(), 1);
	}
}

fn runtime_with_fault<'a>(
	system: &'a System<G>,
	hints: &'a HintRegistry<G>,
	seed: u64,
) -> SolverRuntime<'a, G, FaultInjector> {
	SolverRuntime::new(system, hints, SolverConfig::sequential())
		.with_faults(FaultInjector::new(seed, 1, 1.0))
}

#[test]
fn test_custom_hint() {
	struct Square;

	impl crate::Hint<G> for Square {
		fn execute(&self, inputs: &[G], outputs: &mut [G]) -> Result<(), crate::HintError> {
			for (out, x) in outputs.iter_mut().zip(inputs) {
				*out = x.square();
			}
			Ok(())
		}
	}

	let mut hints = HintRegistry::<G>::new();
	let square = hints.register(Box::new(Square));
	let inverse = hints.register(Box::new(InverseHint));
	assert_eq!(hints.len(), 2);

	let (mut system, bps) = system_with_blueprints();
	let x = system.add_public_input();
	let y = system.add_public_input();
	let squares = system
		.add_hint(bps.hint, square, vec![wire(x), wire(y)], 2)
		.unwrap();
	let inv = system
		.add_hint(bps.hint, inverse, vec![wire(squares.outputs.start)], 1)
		.unwrap();
	assert_eq!(inv.level, Level(2));

	let solution = SolverRuntime::new(&system, &hints, SolverConfig::default())
		.solve(&[G::new(3), G::new(4)], &[])
		.unwrap();
	assert_eq!(solution.get(squares.outputs.start + 1), G::new(16));
	assert_eq!(solution.get(inv.outputs.start) * G::new(9), G::ONE);
}

#[test]
fn test_fault_on_last_instruction_is_rejected() {
	let (mut system, bps) = system_with_blueprints();
	let x = system.add_public_input();
	system.add_hint(bps.hint, INVERSE, vec![wire(x)], 1).unwrap();

	let hints = HintRegistry::with_builtins();
	for seed in 0..16 {
		let runtime = runtime_with_fault(&system, &hints, seed);
		let err = runtime.solve(&[G::new(9)], &[]).unwrap_err();
		assert!(
			matches!(
				err,
				SolveError::Calldata {
					instruction: 0,
					source: CalldataError::OutOfBounds { .. } | CalldataError::LengthMismatch { .. }
				}
			),
			"seed {seed}: {err}"
		);
		assert_eq!(runtime.faults().num_faults(), 1);
	}

	let id = InstructionId::new(0);
	let overrun = (0..16)
		.map(|seed| system.unpack(id, &FaultInjector::new(seed, 1, 1.0)))
		.filter(|inst| matches!(inst, Err(CalldataError::OutOfBounds { .. })))
		.count();
	assert!(overrun > 0);
	assert_eq!(system.unpack(id, &crate::NoFaults), Ok(system.instruction(id)));
}

#[test]
fn test_lookup_table_is_cleared_by_reset_only() {
	let (mut system, bps) = system_with_blueprints();
	let table = (0..2).map(|_| system.add_public_input()).collect::<Vec<_>>();
	let index = system.add_secret_input();
	let entries = table.iter().map(|&w| wire(w)).collect::<Vec<_>>();
	system.add_lookup(bps.lookup, &entries, &[wire(index)]).unwrap();

	let mut wires = WireValues::new(system.nb_wires());
	for (w, value) in [(table[0], 7), (table[1], 8), (index, 1)] {
		wires.set(w, G::new(value)).unwrap();
	}
	let inst = system.instruction(InstructionId::new(0));
	let mut blueprint = system.blueprint(bps.lookup).clone();
	let mut solver = DirectSolver::new(system.coeffs(), &mut wires);
	blueprint.solve(&mut solver, &inst).unwrap();
	blueprint.solve(&mut solver, &inst).unwrap();

	let Blueprint::Lookup(lookup) = &mut blueprint else {
		unreachable!()
	};
	assert_eq!(lookup.table(), &[7, 8, 7, 8].map(G::new));
	lookup.reset();
	assert!(lookup.table().is_empty());
}

#[test]
fn test_bool_on_unproduced_wire_is_rejected() {
	let (mut system, bps) = system_with_blueprints();
	let a = system.add_public_input();
	let b = system.add_public_input();
	let c = system.add_internal_wire();
	let boolean = SparseR1c {
		xa: c,
		xb: c,
		xc: c,
		ql: COEFF_ID_MINUS_ONE,
		qm: COEFF_ID_ONE,
		..SparseR1c::default()
	};
	assert_eq!(
		system.add_sparse_r1c(bps.bool_, &boolean),
		Err(CalldataError::UnproducedWire { wire: c })
	);
	assert_eq!(system.nb_instructions(), 0);
	assert!(!system.tree().has_wire(c));

	let product = system.add_sparse_r1c(bps.mul, &mul(a, b, c)).unwrap();
	let check = system.add_sparse_r1c(bps.bool_, &boolean).unwrap();
	assert_eq!(check.level, product.level.next());

	let solution = solve_with(&system, SolverConfig::default(), &[G::ONE, G::ONE], &[]).unwrap();
	assert_eq!(solution.get(c), G::ONE);
	let err = solve_with(&system, SolverConfig::default(), &[G::ONE, G::new(2)], &[]).unwrap_err();
	assert!(matches!(err, SolveError::UnsolvableConstraint { instruction: 1, .. }), "{err}");
}

#[test]
fn test_unknown_coeff_is_rejected_at_append() {
	let (mut system, bps) = system_with_blueprints();
	let a = system.add_public_input();
	let b = system.add_public_input();
	let c = system.add_internal_wire();
	let n_coeffs = system.coeffs().len();

	assert_eq!(
		system.add_sparse_r1c(bps.add, &add(a, b, c, 999, COEFF_ID_ONE)),
		Err(CalldataError::UnknownCoeff {
			coeff_id: 999,
			len: n_coeffs
		})
	);
	let unknown = LinearExpression::new(vec![Term::new(n_coeffs as u32, a)]);
	assert_eq!(
		system.add_hint(bps.hint, INVERSE, vec![unknown.clone()], 1),
		Err(CalldataError::UnknownCoeff {
			coeff_id: n_coeffs as u32,
			len: n_coeffs
		})
	);
	assert!(matches!(
		system.add_lookup(bps.lookup, &[wire(a)], &[unknown]),
		Err(CalldataError::UnknownCoeff { .. })
	));
	assert_eq!(system.nb_instructions(), 0);
	assert_eq!(system.nb_wires(), 3);

	let seven = system.add_coeff(G::new(7));
	system
		.add_sparse_r1c(bps.add, &add(a, b, c, seven, COEFF_ID_ONE))
		.unwrap();
	let solution = solve_with(&system, SolverConfig::default(), &[G::new(2), G::new(3)], &[]).unwrap();
	assert_eq!(solution.get(c), G::new(17));
}

#[test]
fn test_hint_output_range_overflow_is_rejected() {
	let (mut system, bps) = system_with_blueprints();
	let x = system.add_public_input();
	assert_eq!(
		system.add_hint(bps.hint, INVERSE, vec![wire(x)], u32::MAX as usize),
		Err(CalldataError::WireOverflow {
			start: 1,
			len: u32::MAX as usize
		})
	);
	assert!(matches!(
		system.add_hint(bps.hint, INVERSE, vec![wire(x)], usize::MAX),
		Err(CalldataError::WireOverflow { .. })
	));
	assert_eq!(system.nb_instructions(), 0);
	assert_eq!(system.nb_wires(), 1);
}

#[test]
fn test_entity_ids_debug_format() {
	assert_eq!(format!("{:?}", InstructionId::new(3)), "InstructionId(3)");
	assert_eq!(format!("{:?}", BlueprintId::new(1)), "BlueprintId(1)");
}

/// Builds a random, satisfiable system over `n_inputs` inputs and checks the level invariant of
/// every appended instruction on the way.
fn random_system(seed: u64, n_inputs: usize, n_steps: usize) -> (System<G>, Vec<G>, Vec<G>) {
	let mut rng = StdRng::seed_from_u64(seed);
	let (mut system, bps) = system_with_blueprints();
	let n_public = n_inputs / 2;
	let mut known = (0..n_inputs)
		.map(|i| {
			if i < n_public {
				system.add_public_input()
			} else {
				system.add_secret_input()
			}
		})
		.collect::<Vec<_>>();

	for _ in 0..n_steps {
		let a = known[rng.random_range(0..known.len())];
		let b = known[rng.random_range(0..known.len())];
		let (appended, reads, writes) = match rng.random_range(0..4) {
			0 => {
				let c = system.add_internal_wire();
				let appended = system.add_sparse_r1c(bps.mul, &mul(a, b, c)).unwrap();
				(appended, vec![a, b], c)
			}
			1 => {
				let c = system.add_internal_wire();
				let ql = system.add_coeff(G::new(rng.random::<u64>()));
				let qr = system.add_coeff(G::new(rng.random::<u64>()));
				let appended = system.add_sparse_r1c(bps.add, &add(a, b, c, ql, qr)).unwrap();
				(appended, vec![a, b], c)
			}
			2 => {
				let out = system.add_internal_wire();
				let c = R1c {
					l: LinearExpression::new(vec![
						Term::new(COEFF_ID_ONE, a),
						Term::new(COEFF_ID_TWO, b),
					]),
					r: wire(b),
					o: wire(out),
				};
				let appended = system.add_r1c(bps.r1c, &c).unwrap();
				(appended, vec![a, b], out)
			}
			_ => {
				let appended = system.add_hint(bps.hint, INVERSE, vec![wire(a)], 1).unwrap();
				(appended, vec![a], appended.outputs.start)
			}
		};

		let tree = system.tree();
		for wire in reads {
			let level = tree.wire_level(wire).unwrap();
			assert!(
				level < appended.level,
				"input {wire} at {level}, instruction at {}",
				appended.level
			);
		}
		assert_eq!(tree.wire_level(writes), Some(appended.level));
		known.push(writes);
	}

	let mut values = (0..n_inputs)
		.map(|_| G::new(rng.random::<u64>()))
		.collect::<Vec<_>>();
	let secret = values.split_off(n_public);
	(system, values, secret)
}

proptest! {
	#[test]
	fn prop_level_invariant(seed in any::<u64>(), n_inputs in 1usize..6, n_steps in 0usize..40) {
		let (system, _, _) = random_system(seed, n_inputs, n_steps);
		for wire in system.public_inputs().iter().chain(system.secret_inputs()) {
			prop_assert_eq!(system.tree().wire_level(*wire), Some(Level::BASE));
		}
		let mut n_instructions = 0;
		for level in system.levels() {
			prop_assert!(!level.is_empty());
			n_instructions += level.len();
		}
		prop_assert_eq!(n_instructions, system.nb_instructions());
	}

	#[test]
	fn prop_parallel_matches_sequential(seed in any::<u64>(), n_steps in 1usize..60) {
		let (system, public, secret) = random_system(seed, 4, n_steps);
		let sequential = solve_with(&system, SolverConfig::sequential(), &public, &secret);
		let parallel = SolverConfig {
			parallel: true,
			min_parallel_width: 1,
		};
		let parallel = solve_with(&system, parallel, &public, &secret);
		prop_assert_eq!(sequential.unwrap(), parallel.unwrap());
	}

	#[test]
	fn prop_calldata_size_consistency(seed in any::<u64>(), n_steps in 1usize..30) {
		let (system, _, _) = random_system(seed, 3, n_steps);
		let mut next_start = 0;
		for inst in system.instructions() {
			let packed = system.packed(inst.id);
			prop_assert_eq!(packed.calldata_start as usize, next_start);
			match system.blueprint(inst.blueprint_id).calldata_size() {
				CalldataSize::Fixed(n) => {
					prop_assert_eq!(inst.calldata.len(), n);
				}
				CalldataSize::Unknown => {
					prop_assert_eq!(inst.calldata[0] as usize, inst.calldata.len());
				}
			}
			next_start += inst.calldata.len();
		}
		prop_assert_eq!(next_start, system.calldata().len());
		prop_assert!(system.decompress_r1cs().all(|c| c.is_ok()));
		prop_assert!(system.decompress_sparse_r1cs().all(|c| c.is_ok()));
	}

	#[test]
	fn prop_r1c_roundtrip(
		terms in prop::collection::vec((any::<u32>(), any::<u32>()), 0..12),
		split in (0usize..12, 0usize..12),
	) {
		let terms = terms.into_iter().map(|(c, w)| Term::new(c, w)).collect::<Vec<_>>();
		let i = split.0.min(terms.len());
		let j = split.1.clamp(i, terms.len());
		let c = R1c {
			l: terms[..i].iter().copied().collect(),
			r: terms[i..j].iter().copied().collect(),
			o: terms[j..].iter().copied().collect(),
		};
		let bp = Blueprint::<G>::generic_r1c();
		let mut words = vec![];
		bp.compress_r1c(&c, &mut words);
		prop_assert_eq!(words[0] as usize, words.len());
		prop_assert_eq!(bp.decompress_r1c(&view(&words)), Ok(c));
	}
}
