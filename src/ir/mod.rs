//! Intermediate Representation (IR) for the six-register machine

pub mod instructions;
pub mod types;

// Re-export commonly used types
pub use instructions::{Instruction, Program};
pub use types::{Opcode, OperandKind, Operation, REGISTER_COUNT};
