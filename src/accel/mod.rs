//! Loop acceleration: symbolic discovery of loop patterns and jump-ahead replay
//!
//! The pipeline flows one way:
//! - `discovery` runs the symbolic interpreter alongside the concrete one and
//!   hands its history to `extractor`
//! - `extractor` proves two history entries differ by a constant vector and
//!   emits a `Pattern`
//! - `library` stores patterns and matches them against concrete states
//! - `accelerator` computes how many iterations a matched pattern can skip
//! - `replay` and `driver` tie these together around the concrete interpreter

pub mod accelerator;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod extractor;
pub mod library;
pub mod pattern;
pub mod replay;
pub mod result;

#[cfg(test)]
pub(crate) mod test_fixture;

pub use config::AccelConfig;
pub use discovery::discover;
pub use driver::Driver;
pub use result::RunStatistics;

use z3::{SatResult, Solver};

/// Run a satisfiability check and count it
pub(crate) fn check(solver: &Solver, stats: &mut RunStatistics) -> SatResult {
    stats.solver_queries += 1;
    solver.check()
}
