//! Proven loop patterns

use crate::accel::check;
use crate::accel::result::RunStatistics;
use crate::error::EngineError;
use crate::ir::REGISTER_COUNT;
use crate::semantics::smt::{create_solver_with_config, register_variables};
use crate::semantics::{ConcreteState, RegisterFile, SolverConfig, SymbolicState, Value};
use std::fmt;
use tracing::trace;
use z3::ast::{Ast, Bool, Int};
use z3::SatResult;

/// Value given to free variables that a model leaves unconstrained
pub const UNCONSTRAINED_WITNESS: i64 = 0;

/// An assignment to the free variables `x0..x5`
pub type Assignment = [i64; REGISTER_COUNT];

/// One loop iteration's effect: from any state `start(x)` with `guard(x)` true,
/// the loop body leads to `start(x) + shift`
#[derive(Debug, Clone)]
pub struct Pattern {
    start: SymbolicState,
    guard: Bool,
    shift: [i64; REGISTER_COUNT],
}

impl Pattern {
    pub fn new(start: SymbolicState, guard: Bool, shift: [i64; REGISTER_COUNT]) -> Self {
        Self {
            start,
            guard: guard.simplify(),
            shift,
        }
    }

    pub fn start(&self) -> &SymbolicState {
        &self.start
    }

    pub fn guard(&self) -> &Bool {
        &self.guard
    }

    pub fn shift(&self) -> &[i64; REGISTER_COUNT] {
        &self.shift
    }

    /// Recover the coordinates of `state` in this pattern's template.
    ///
    /// Returns None when no assignment satisfying the guard produces `state`.
    pub fn matches(
        &self,
        state: &ConcreteState,
        solver_config: &SolverConfig,
        stats: &mut RunStatistics,
    ) -> Option<Assignment> {
        let solver = create_solver_with_config(solver_config);
        solver.assert(&self.guard);
        for (template, value) in self.start.iter().zip(state.iter()) {
            solver.assert(&template.to_ast().eq(&Int::from_i64(*value)));
        }

        match check(&solver, stats) {
            SatResult::Sat => {}
            result => {
                trace!(?result, %state, "pattern does not match");
                return None;
            }
        }

        let model = solver.get_model()?;
        let vars = register_variables();
        Some(std::array::from_fn(|i| {
            model
                .eval(&vars[i], false)
                .and_then(|v| v.as_i64())
                .unwrap_or(UNCONSTRAINED_WITNESS)
        }))
    }

    /// Evaluate the template at `vars`: symbolic slots are substituted, literal slots pass through
    pub fn materialize(&self, vars: &Assignment) -> Result<ConcreteState, EngineError> {
        let (free, values) = substitution(vars);
        let pairs: Vec<(&Int, &Int)> = free.iter().zip(values.iter()).collect();

        let mut state = ConcreteState::zeroed();
        for (register, template) in self.start.iter().enumerate() {
            state[register] = match template {
                Value::Int(n) => *n,
                Value::Symbolic(expr) => expr
                    .substitute(&pairs)
                    .simplify()
                    .as_i64()
                    .ok_or(EngineError::NonConcreteResult { register })?,
            };
        }
        Ok(state)
    }

    /// Whether the guard holds at `vars`; None if it does not reduce to a constant
    pub fn guard_holds(&self, vars: &Assignment) -> Option<bool> {
        let (free, values) = substitution(vars);
        let pairs: Vec<(&Int, &Int)> = free.iter().zip(values.iter()).collect();
        self.guard.substitute(&pairs).simplify().as_bool()
    }

    /// `vars + k * shift`, or None on overflow
    pub fn advance(&self, vars: &Assignment, k: i64) -> Option<Assignment> {
        let mut next = *vars;
        for (slot, delta) in next.iter_mut().zip(self.shift.iter()) {
            let current = *slot;
            *slot = delta.checked_mul(k).and_then(|step| current.checked_add(step))?;
        }
        Some(next)
    }
}

fn substitution(vars: &Assignment) -> ([Int; REGISTER_COUNT], [Int; REGISTER_COUNT]) {
    (register_variables(), vars.map(Int::from_i64))
}

// Guards are simplified on construction, so rendering identifies them structurally.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.shift == other.shift
            && self.start == other.start
            && self.guard.to_string() == other.guard.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pattern({}, {}, {})",
            self.start,
            self.guard,
            RegisterFile(self.shift)
        )
    }
}
