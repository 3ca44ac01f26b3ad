//! Fast replay: concrete execution that jumps over known loops

use crate::accel::accelerator::{jump_ahead, JumpOutcome};
use crate::accel::config::AccelConfig;
use crate::accel::library::PatternLibrary;
use crate::accel::result::RunStatistics;
use crate::error::EngineError;
use crate::ir::Program;
use crate::semantics::{step, ConcreteState};
use tracing::trace;

/// Run from `state` for at most `config.replay_budget` iterations.
///
/// Each iteration consults the library; a match that yields a positive jump
/// replaces the state, anything else executes exactly one instruction. Stops
/// early once the instruction pointer leaves the program.
pub fn fast_run(
    program: &Program,
    mut state: ConcreteState,
    library: &PatternLibrary,
    config: &AccelConfig,
    stats: &mut RunStatistics,
) -> Result<ConcreteState, EngineError> {
    let ip_register = program.ip_register();

    for _ in 0..config.replay_budget {
        if !program.contains(state[ip_register]) {
            trace!(%state, "program halted");
            break;
        }

        if let Some((pattern, vars)) = library.find_match(&state, &config.solver, stats) {
            stats.pattern_matches += 1;
            if let JumpOutcome::Jumped {
                state: next,
                iterations,
            } = jump_ahead(pattern, &vars, &state, config, stats)?
            {
                trace!(iterations, to = %next, "jump adopted");
                state = next;
                continue;
            }
        }

        step(program, &mut state)?;
        stats.concrete_steps += 1;
    }

    Ok(state)
}
