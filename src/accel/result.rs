//! Run statistics and reports

use crate::semantics::ConcreteState;
use std::time::Duration;

/// Counters collected across discovery and replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Instructions executed by the concrete interpreter
    pub concrete_steps: u64,
    /// Instructions executed by the symbolic interpreter
    pub symbolic_steps: u64,
    /// Number of discovery probes started
    pub discovery_runs: u64,
    /// Patterns newly added to the library
    pub patterns_found: u64,
    /// Total solver satisfiability checks
    pub solver_queries: u64,
    /// Matches of a library pattern against a concrete state
    pub pattern_matches: u64,
    /// Jumps adopted
    pub jumps_taken: u64,
    /// Matches that did not yield a jump
    pub jumps_declined: u64,
    /// Loop iterations replaced by jumps
    pub iterations_skipped: u64,
    pub elapsed_time: Duration,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of pattern matches that turned into a jump (0.0 to 1.0)
    pub fn jump_rate(&self) -> f64 {
        if self.pattern_matches == 0 {
            0.0
        } else {
            self.jumps_taken as f64 / self.pattern_matches as f64
        }
    }
}

/// Final result of a driver run
#[derive(Debug, Clone)]
pub struct DriverReport {
    pub state: ConcreteState,
    /// The instruction pointer left the program
    pub halted: bool,
    /// Discovery/replay cycles completed
    pub cycles: u64,
    pub statistics: RunStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_rate() {
        let mut stats = RunStatistics::new();
        assert_eq!(stats.jump_rate(), 0.0);
        stats.pattern_matches = 4;
        stats.jumps_taken = 1;
        assert_eq!(stats.jump_rate(), 0.25);
    }
}
