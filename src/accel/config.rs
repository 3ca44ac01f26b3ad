//! Configuration for discovery and replay

use crate::semantics::SolverConfig;

/// Tunable parameters of the discovery/replay cycle
#[derive(Debug, Clone)]
pub struct AccelConfig {
    /// Symbolic steps per discovery probe
    pub discovery_window: usize,
    /// Iterations per fast-replay call
    pub replay_budget: u64,
    /// Outer discovery/replay alternations
    pub cycles: u64,
    /// Ceiling of the jump-length binary search
    pub k_search_upper_bound: i64,
    /// Re-check every computed jump before adopting it
    pub verify_jumps: bool,
    /// Solver settings used for every query
    pub solver: SolverConfig,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            discovery_window: 12,
            replay_budget: 200,
            cycles: 2000,
            k_search_upper_bound: 1_000_000_000,
            verify_jumps: true,
            solver: SolverConfig::default(),
        }
    }
}

impl AccelConfig {
    pub fn with_discovery_window(mut self, steps: usize) -> Self {
        self.discovery_window = steps;
        self
    }

    pub fn with_replay_budget(mut self, steps: u64) -> Self {
        self.replay_budget = steps;
        self
    }

    pub fn with_cycles(mut self, cycles: u64) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_k_search_upper_bound(mut self, bound: i64) -> Self {
        self.k_search_upper_bound = bound.max(1);
        self
    }

    pub fn with_verify_jumps(mut self, verify: bool) -> Self {
        self.verify_jumps = verify;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = AccelConfig::default();
        assert_eq!(config.discovery_window, 12);
        assert_eq!(config.replay_budget, 200);
        assert_eq!(config.cycles, 2000);
        assert_eq!(config.k_search_upper_bound, 1_000_000_000);
        assert!(config.verify_jumps);
        assert!(config.solver.timeout.is_none());
    }

    #[test]
    fn test_builder() {
        let config = AccelConfig::default()
            .with_discovery_window(20)
            .with_replay_budget(5)
            .with_cycles(3)
            .with_k_search_upper_bound(0)
            .with_verify_jumps(false)
            .with_solver(SolverConfig::with_timeout_secs(2));
        assert_eq!(config.discovery_window, 20);
        assert_eq!(config.replay_budget, 5);
        assert_eq!(config.cycles, 3);
        // the search needs at least one candidate
        assert_eq!(config.k_search_upper_bound, 1);
        assert!(!config.verify_jumps);
        assert_eq!(config.solver.timeout, Some(Duration::from_secs(2)));
    }
}
