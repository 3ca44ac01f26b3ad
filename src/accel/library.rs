//! Append-only pattern library

use crate::accel::pattern::{Assignment, Pattern};
use crate::accel::result::RunStatistics;
use crate::semantics::{ConcreteState, SolverConfig};

/// Patterns discovered so far, in insertion order.
///
/// Entries are never removed or mutated; `version` increases with every insertion.
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
    version: u64,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern; returns false if a structurally equal one is already present
    pub fn insert(&mut self, pattern: Pattern) -> bool {
        if self.patterns.contains(&pattern) {
            return false;
        }
        self.patterns.push(pattern);
        self.version += 1;
        true
    }

    /// First pattern (by insertion order) matching `state`, with the recovered assignment
    pub fn find_match(
        &self,
        state: &ConcreteState,
        solver_config: &SolverConfig,
        stats: &mut RunStatistics,
    ) -> Option<(&Pattern, Assignment)> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .matches(state, solver_config, stats)
                .map(|vars| (pattern, vars))
        })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }
}
