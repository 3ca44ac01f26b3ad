//! Symbolic discovery runs

use crate::accel::config::AccelConfig;
use crate::accel::extractor::{find_shifted, Snapshot};
use crate::accel::pattern::Pattern;
use crate::accel::result::RunStatistics;
use crate::error::EngineError;
use crate::ir::Program;
use crate::semantics::smt::fresh_symbolic_state;
use crate::semantics::{step, step_symbolic, ConcreteState, Value};
use tracing::{debug, trace};
use z3::ast::{Ast, Bool, Int};

/// Outcome of one discovery probe
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Pattern proven during the probe, if any
    pub pattern: Option<Pattern>,
    /// Every (symbolic, concrete) pair recorded, in step order
    pub history: Vec<Snapshot>,
    /// Branch constraints forced by the concrete control flow
    pub path_condition: Vec<Bool>,
}

/// Probe the program from `state` for at most `config.discovery_window` steps.
///
/// The concrete copy decides control flow; the symbolic copy starts from the
/// free variables (the instruction pointer stays concrete) and tracks data.
/// Whenever the symbolic instruction pointer is left holding a term, the branch
/// that produced it is recorded as `term == concrete ip` and the slot is reset
/// to the concrete value. The probe stops as soon as a pattern is proven.
/// `state` itself is not modified.
pub fn discover(
    program: &Program,
    state: &ConcreteState,
    config: &AccelConfig,
    stats: &mut RunStatistics,
) -> Result<Discovery, EngineError> {
    let ip_register = program.ip_register();
    let mut concrete = state.clone();
    let mut symbolic = fresh_symbolic_state(ip_register, concrete[ip_register]);
    let mut history = Vec::with_capacity(config.discovery_window);
    let mut path_condition = Vec::new();
    let mut pattern = None;

    stats.discovery_runs += 1;

    for _ in 0..config.discovery_window {
        let ip = concrete[ip_register];
        if !program.contains(ip) {
            break;
        }

        step_symbolic(program, &mut symbolic, ip)?;
        step(program, &mut concrete)?;
        stats.symbolic_steps += 1;

        history.push(Snapshot {
            symbolic: symbolic.clone(),
            concrete: concrete.clone(),
        });

        if let Value::Symbolic(expr) = &symbolic[ip_register] {
            let taken = concrete[ip_register];
            let condition = expr.eq(&Int::from_i64(taken)).simplify();
            trace!(%condition, ip = taken, "branch constraint");
            path_condition.push(condition);
            symbolic[ip_register] = Value::Int(taken);
        }

        pattern = find_shifted(
            &path_condition,
            &history,
            ip_register,
            &config.solver,
            stats,
        );
        if pattern.is_some() {
            break;
        }
    }

    debug!(
        steps = history.len(),
        constraints = path_condition.len(),
        found = pattern.is_some(),
        "discovery finished"
    );

    Ok(Discovery {
        pattern,
        history,
        path_condition,
    })
}
