//! Random register files for property checks

use crate::ir::REGISTER_COUNT;
use crate::semantics::state::{ConcreteState, RegisterFile};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration for random register-file generation
#[derive(Debug, Clone)]
pub struct RandomStateConfig {
    /// Number of register files to generate
    pub count: usize,
    /// Values are drawn from `-magnitude..=magnitude`
    pub magnitude: i64,
    /// Seed for the generator (None = seeded from the OS)
    pub seed: Option<u64>,
}

impl Default for RandomStateConfig {
    fn default() -> Self {
        RandomStateConfig {
            count: 10,
            // keeps products of two registers well inside i64
            magnitude: 1 << 20,
            seed: None,
        }
    }
}

impl RandomStateConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[allow(dead_code)]
    pub fn with_magnitude(mut self, magnitude: i64) -> Self {
        self.magnitude = magnitude.abs();
        self
    }
}

/// Generate random concrete register files
pub fn generate_random_states(config: &RandomStateConfig) -> Vec<ConcreteState> {
    let mut rng: ChaCha8Rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    (0..config.count)
        .map(|_| {
            RegisterFile(std::array::from_fn(|_| {
                rng.random_range(-config.magnitude..=config.magnitude)
            }))
        })
        .collect()
}

/// Register files built from boundary values: every register equal, then pairs
pub fn generate_edge_case_states() -> Vec<ConcreteState> {
    let edge_values: [i64; 7] = [0, 1, -1, 2, 255, 256, 1 << 24];

    let mut states: Vec<ConcreteState> = edge_values
        .iter()
        .map(|&v| RegisterFile([v; REGISTER_COUNT]))
        .collect();

    for &first in &edge_values[..4] {
        for &second in &edge_values[..4] {
            let mut state = ConcreteState::zeroed();
            state[0] = first;
            state[1] = second;
            states.push(state);
        }
    }

    states
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_states_count() {
        let states = generate_random_states(&RandomStateConfig::default().with_count(5));
        assert_eq!(states.len(), 5);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = RandomStateConfig::default().with_count(20).with_seed(42);
        assert_eq!(generate_random_states(&config), generate_random_states(&config));
    }

    #[test]
    fn test_values_stay_within_magnitude() {
        let config = RandomStateConfig::default()
            .with_count(100)
            .with_seed(1)
            .with_magnitude(50);
        for state in generate_random_states(&config) {
            assert!(state.iter().all(|v| (-50..=50).contains(v)));
        }
    }

    #[test]
    fn test_generate_random_states_varies() {
        let states = generate_random_states(&RandomStateConfig::default().with_count(10));
        let unique = states
            .iter()
            .map(|s| s[0])
            .collect::<std::collections::HashSet<_>>()
            .len();
        assert!(unique > 1);
    }

    #[test]
    fn test_edge_cases_contain_zero_and_negative_one() {
        let states = generate_edge_case_states();
        assert!(states.iter().any(|s| s.iter().all(|&v| v == 0)));
        assert!(states.iter().any(|s| s.iter().all(|&v| v == -1)));
    }
}
