//! Jump-ahead over a matched pattern

use crate::accel::check;
use crate::accel::config::AccelConfig;
use crate::accel::pattern::{Assignment, Pattern};
use crate::accel::result::RunStatistics;
use crate::error::EngineError;
use crate::semantics::smt::{create_solver_with_config, register_variables};
use crate::semantics::ConcreteState;
use tracing::{debug, trace, warn};
use z3::ast::Int;
use z3::SatResult;

/// Result of trying to skip iterations with a matched pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpOutcome {
    /// The loop body was applied `iterations` times in one step
    Jumped {
        state: ConcreteState,
        iterations: i64,
    },
    /// No positive number of iterations is safe from here
    Declined,
}

/// Smallest `m` in `(lower, upper]` with `predicate(m)` true, assuming the
/// predicate is monotone and holds at `upper`
fn minimize(mut lower: i64, mut upper: i64, mut predicate: impl FnMut(i64) -> bool) -> i64 {
    while lower + 1 < upper {
        let mid = lower + (upper - lower) / 2;
        if predicate(mid) {
            upper = mid;
        } else {
            lower = mid;
        }
    }
    upper
}

/// Is there `0 <= k <= bound` with `vars + k*shift` violating the guard?
///
/// An `unknown` answer counts as a violation so the search can only shrink.
fn violation_within(
    pattern: &Pattern,
    vars: &Assignment,
    bound: i64,
    config: &AccelConfig,
    stats: &mut RunStatistics,
) -> bool {
    let solver = create_solver_with_config(&config.solver);
    let k = Int::new_const("k");
    solver.assert(&k.ge(&Int::from_i64(0)));
    solver.assert(&k.le(&Int::from_i64(bound)));

    for ((x, value), delta) in register_variables()
        .iter()
        .zip(vars.iter())
        .zip(pattern.shift().iter())
    {
        let moved = Int::add(&[
            &Int::from_i64(*value),
            &Int::mul(&[&k, &Int::from_i64(*delta)]),
        ]);
        solver.assert(&x.eq(&moved));
    }
    solver.assert(&pattern.guard().not());

    check(&solver, stats) != SatResult::Unsat
}

/// Apply `pattern` as many times as its guard allows, starting from the
/// assignment `vars` recovered for `state`.
///
/// The search finds the first `m` where some `k <= m` violates the guard and
/// jumps `m - 1` iterations. It relies on the guard failing monotonically
/// along `vars + k*shift`; with `verify_jumps` the target is re-checked against
/// the guard and against `state + k*shift` before it is adopted.
pub fn jump_ahead(
    pattern: &Pattern,
    vars: &Assignment,
    state: &ConcreteState,
    config: &AccelConfig,
    stats: &mut RunStatistics,
) -> Result<JumpOutcome, EngineError> {
    let upper = config.k_search_upper_bound;
    let boundary = minimize(0, upper, |m| violation_within(pattern, vars, m, config, stats));
    let k = boundary - 1;

    if k <= 0 {
        trace!(%state, "no iterations to skip");
        stats.jumps_declined += 1;
        return Ok(JumpOutcome::Declined);
    }

    let Some(target) = pattern.advance(vars, k) else {
        warn!(k, "jump target overflows");
        stats.jumps_declined += 1;
        return Ok(JumpOutcome::Declined);
    };
    let next = pattern.materialize(&target)?;

    if config.verify_jumps && !jump_is_consistent(pattern, vars, state, &next, &target, k, upper) {
        stats.jumps_declined += 1;
        return Ok(JumpOutcome::Declined);
    }

    debug!(k, from = %state, to = %next, "jumped ahead");
    stats.jumps_taken += 1;
    stats.iterations_skipped += k as u64;
    Ok(JumpOutcome::Jumped {
        state: next,
        iterations: k,
    })
}

fn jump_is_consistent(
    pattern: &Pattern,
    vars: &Assignment,
    state: &ConcreteState,
    next: &ConcreteState,
    target: &Assignment,
    k: i64,
    upper: i64,
) -> bool {
    if pattern.guard_holds(target) != Some(true) {
        warn!(k, %pattern, "guard fails at the jump target");
        return false;
    }

    for (register, delta) in pattern.shift().iter().enumerate() {
        let expected = delta
            .checked_mul(k)
            .and_then(|step| state[register].checked_add(step));
        if expected != Some(next[register]) {
            warn!(
                k,
                register,
                got = next[register],
                ?expected,
                "template does not advance linearly"
            );
            return false;
        }
    }

    if k + 1 < upper {
        let beyond = pattern.advance(vars, k + 1);
        if beyond.and_then(|b| pattern.guard_holds(&b)) == Some(true) {
            debug!(k, "guard still holds one iteration further; search was not maximal");
        }
    }
    true
}
