//! Engine error type

use thiserror::Error;

/// Errors raised by the interpreters and the jump-ahead machinery
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The instruction pointer slot held a symbolic expression when a step was requested
    #[error("instruction pointer register r{register} is not a concrete integer: {value}")]
    InvalidIpType { register: usize, value: String },

    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),

    #[error("{opcode}: register operand {index} is out of range (0..6)")]
    RegisterOutOfRange { index: i64, opcode: String },

    #[error("instruction pointer {ip} is outside the program (length {len})")]
    IpOutOfRange { ip: i64, len: usize },

    #[error("{opcode}: arithmetic overflow")]
    ArithmeticOverflow { opcode: String },

    /// A pattern template did not reduce to an integer after substitution
    #[error("register r{register} did not evaluate to an integer")]
    NonConcreteResult { register: usize },
}
