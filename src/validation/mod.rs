//! Validation utilities for checking interpreter semantics

pub mod random;

#[allow(unused_imports)]
pub use random::{generate_edge_case_states, generate_random_states, RandomStateConfig};
