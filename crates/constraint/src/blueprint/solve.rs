// Copyright 2025 Irreducible Inc.
//! Leveling and solving shared by the R1C family of blueprints.
//!
//! A rank-1 constraint does not say which of its wires is the output. At append time every wire
//! that has no level yet is claimed by the constraint; at solve time the constraint must then be
//! linear in the single wire that is still unknown.

use smallvec::SmallVec;
use tessera_core::{Field, SparseR1c, Term, consts::COEFF_ID_ONE};

use crate::{
	error::SolveError,
	instruction::Instruction,
	solver::Solver,
	tree::{InstructionTree, Level},
};

/// Places an instruction one level above the highest of its leveled wires and claims the others
/// as its outputs.
///
/// # Panics
/// Panics if a wire was never allocated.
pub fn level_and_claim(tree: &mut InstructionTree, wires: impl IntoIterator<Item = u32>) -> Level {
	let mut max = Level::BASE;
	let mut claimed = SmallVec::<[u32; 2]>::new();
	for wire in wires {
		match tree.wire_level(wire) {
			Some(level) => max = max.max(level),
			None if !claimed.contains(&wire) => claimed.push(wire),
			None => {}
		}
	}

	let level = max.next();
	for wire in claimed {
		tree.insert_wire(wire, level);
	}
	level
}

pub(crate) fn unsolvable(inst: &Instruction<'_>, reason: &'static str) -> SolveError {
	SolveError::UnsolvableConstraint {
		instruction: inst.index(),
		reason,
	}
}

/// Tracks the single unsolved wire of a constraint.
#[derive(Default)]
struct Unknown(Option<u32>);

impl Unknown {
	/// Registers `wire` as the unknown, failing if a different wire already is.
	fn claim(&mut self, wire: u32) -> Result<(), &'static str> {
		match self.0 {
			None => {
				self.0 = Some(wire);
				Ok(())
			}
			Some(unknown) if unknown == wire => Ok(()),
			Some(_) => Err("more than one unsolved wire"),
		}
	}
}

/// A linear expression evaluated up to the unknown wire: `known + coeff⋅unknown`.
#[derive(Clone, Copy)]
struct Partial<F> {
	known: F,
	coeff: F,
}

fn eval_partial<F: Field, S: Solver<F>>(
	solver: &S,
	terms: &[Term],
	unknown: &mut Unknown,
) -> Result<Partial<F>, &'static str> {
	let mut acc = Partial {
		known: F::ZERO,
		coeff: F::ZERO,
	};
	for &term in terms {
		if solver.is_solved(term.wire_id) {
			acc.known = acc.known + solver.term_value(term);
		} else {
			unknown.claim(term.wire_id)?;
			acc.coeff = acc.coeff + solver.get_coeff(term.coeff_id);
		}
	}
	Ok(acc)
}

/// Solves `L⋅R = O` for its single unsolved wire, or checks it if every wire is solved.
pub fn solve_r1c<F: Field, S: Solver<F>>(
	solver: &mut S,
	inst: &Instruction<'_>,
	l: &[Term],
	r: &[Term],
	o: &[Term],
) -> Result<(), SolveError> {
	let mut unknown = Unknown::default();
	let mut eval = |terms: &[Term]| {
		eval_partial(&*solver, terms, &mut unknown).map_err(|reason| unsolvable(inst, reason))
	};
	let (l, r, o) = (eval(l)?, eval(r)?, eval(o)?);

	let Some(wire) = unknown.0 else {
		return if l.known * r.known == o.known {
			Ok(())
		} else {
			Err(unsolvable(inst, "L⋅R ≠ O"))
		};
	};

	// (l0 + l1⋅u)(r0 + r1⋅u) = o0 + o1⋅u
	if !(l.coeff * r.coeff).is_zero() {
		return Err(unsolvable(inst, "quadratic in the unsolved wire"));
	}
	let slope = l.known * r.coeff + l.coeff * r.known - o.coeff;
	let rhs = o.known - l.known * r.known;
	let inv = slope
		.invert()
		.ok_or_else(|| unsolvable(inst, "unsolved wire has a zero coefficient"))?;
	solver.set_value(wire, rhs * inv)
}

/// Evaluates `qL⋅xa + qR⋅xb + qO⋅xc + qM⋅xa⋅xb + qC` with `unknown` substituted by `u`.
fn eval_sparse<F: Field, S: Solver<F>>(
	solver: &S,
	c: &SparseR1c,
	unknown: Option<u32>,
	u: F,
) -> F {
	let value = |wire: u32| {
		if Some(wire) == unknown {
			u
		} else {
			solver.get_value(COEFF_ID_ONE, wire)
		}
	};
	let (a, b, xc) = (value(c.xa), value(c.xb), value(c.xc));
	solver.get_coeff(c.ql) * a
		+ solver.get_coeff(c.qr) * b
		+ solver.get_coeff(c.qo) * xc
		+ solver.get_coeff(c.qm) * a * b
		+ solver.get_coeff(c.qc)
}

/// Solves a sparse constraint for its single unsolved wire, or checks it if every wire is solved.
pub fn solve_sparse_r1c<F: Field, S: Solver<F>>(
	solver: &mut S,
	inst: &Instruction<'_>,
	c: &SparseR1c,
) -> Result<(), SolveError> {
	let mut unknown = Unknown::default();
	for wire in [c.xa, c.xb, c.xc] {
		if !solver.is_solved(wire) {
			unknown.claim(wire).map_err(|reason| unsolvable(inst, reason))?;
		}
	}

	let Some(wire) = unknown.0 else {
		return check_sparse_r1c(&*solver, inst, c);
	};

	if c.xa == wire && c.xb == wire && !solver.get_coeff(c.qm).is_zero() {
		return Err(unsolvable(inst, "quadratic in the unsolved wire"));
	}
	// The constraint is affine in the unknown: f(u) = f(0) + (f(1) - f(0))⋅u.
	let f0 = eval_sparse(&*solver, c, Some(wire), F::ZERO);
	let f1 = eval_sparse(&*solver, c, Some(wire), F::ONE);
	let inv = (f1 - f0)
		.invert()
		.ok_or_else(|| unsolvable(inst, "unsolved wire has a zero coefficient"))?;
	solver.set_value(wire, -f0 * inv)
}

/// Checks a sparse constraint whose wires are all solved.
pub fn check_sparse_r1c<F: Field, S: Solver<F>>(
	solver: &S,
	inst: &Instruction<'_>,
	c: &SparseR1c,
) -> Result<(), SolveError> {
	if [c.xa, c.xb, c.xc]
		.into_iter()
		.any(|wire| !solver.is_solved(wire))
	{
		return Err(unsolvable(inst, "checked constraint reads an unsolved wire"));
	}
	if eval_sparse(solver, c, None, F::ZERO).is_zero() {
		Ok(())
	} else {
		Err(unsolvable(inst, "sparse constraint does not hold"))
	}
}
