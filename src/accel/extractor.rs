//! Pattern extraction from a discovery history

use crate::accel::check;
use crate::accel::pattern::Pattern;
use crate::accel::result::RunStatistics;
use crate::ir::REGISTER_COUNT;
use crate::semantics::smt::create_solver_with_config;
use crate::semantics::{ConcreteState, SolverConfig, SymbolicState, Value};
use tracing::{debug, info};
use z3::ast::{Bool, Int};
use z3::SatResult;

/// One recorded step: the symbolic register file and the concrete one it shadows
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub symbolic: SymbolicState,
    pub concrete: ConcreteState,
}

/// Conjunction of the path condition (true when empty)
pub fn conjunction(conditions: &[Bool]) -> Bool {
    if conditions.is_empty() {
        return Bool::from_bool(true);
    }
    let refs: Vec<&Bool> = conditions.iter().collect();
    Bool::and(&refs)
}

/// Search the history for two snapshots at the same address whose symbolic
/// difference equals their concrete difference for every input satisfying
/// the path condition.
///
/// Pairs are scanned earlier-first, so the first proven pair yields the
/// earlier snapshot as the pattern's start.
pub fn find_shifted(
    conditions: &[Bool],
    history: &[Snapshot],
    ip_register: usize,
    solver_config: &SolverConfig,
    stats: &mut RunStatistics,
) -> Option<Pattern> {
    let path_condition = conjunction(conditions);

    for (i, first) in history.iter().enumerate() {
        for second in &history[i + 1..] {
            if first.concrete == second.concrete
                || first.concrete[ip_register] != second.concrete[ip_register]
            {
                continue;
            }

            let Some(shift) = concrete_shift(&first.concrete, &second.concrete) else {
                continue;
            };

            // A literal slot cannot move under substitution, so the law could never be applied
            if first
                .symbolic
                .iter()
                .zip(shift.iter())
                .any(|(template, delta)| template.is_concrete() && *delta != 0)
            {
                continue;
            }

            if displacement_is_constant(&path_condition, first, second, &shift, solver_config, stats) {
                let pattern = Pattern::new(first.symbolic.clone(), path_condition.clone(), shift);
                info!(%pattern, "loop pattern proven");
                return Some(pattern);
            }
        }
    }

    None
}

fn concrete_shift(
    from: &ConcreteState,
    to: &ConcreteState,
) -> Option<[i64; REGISTER_COUNT]> {
    let mut shift = [0; REGISTER_COUNT];
    for (i, slot) in shift.iter_mut().enumerate() {
        *slot = to[i].checked_sub(from[i])?;
    }
    Some(shift)
}

/// Ask whether `first.symbolic - second.symbolic == -shift` can fail under the path condition
fn displacement_is_constant(
    path_condition: &Bool,
    first: &Snapshot,
    second: &Snapshot,
    shift: &[i64; REGISTER_COUNT],
    solver_config: &SolverConfig,
    stats: &mut RunStatistics,
) -> bool {
    let mut claims = Vec::new();
    for (register, delta) in shift.iter().enumerate() {
        let Some(expected) = delta.checked_neg() else {
            return false;
        };
        let (a, b) = (&first.symbolic[register], &second.symbolic[register]);
        if let (Value::Int(x), Value::Int(y)) = (a, b) {
            if x.checked_sub(*y) == Some(expected) {
                continue;
            }
            return false;
        }
        let difference = Int::sub(&[&a.to_ast(), &b.to_ast()]);
        claims.push(difference.eq(&Int::from_i64(expected)));
    }

    let solver = create_solver_with_config(solver_config);
    solver.assert(path_condition);
    solver.assert(&conjunction(&claims).not());

    let result = check(&solver, stats);
    debug!(
        from = %first.concrete,
        to = %second.concrete,
        ?result,
        "checked displacement"
    );
    result == SatResult::Unsat
}
