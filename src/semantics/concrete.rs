//! Concrete interpreter

use crate::error::EngineError;
use crate::ir::{Instruction, Operation, Program};
use crate::semantics::state::ConcreteState;
use crate::semantics::{destination, read_operands};

/// Evaluate one instruction against a concrete register file, without writing the result
pub fn evaluate_concrete(
    instruction: &Instruction,
    state: &ConcreteState,
) -> Result<i64, EngineError> {
    let (lhs, rhs) = read_operands(instruction, state, |imm| imm)?;
    let overflow = || EngineError::ArithmeticOverflow {
        opcode: instruction.opcode.to_string(),
    };

    let result = match instruction.opcode.operation() {
        Operation::Add => lhs.checked_add(rhs).ok_or_else(overflow)?,
        Operation::Mul => lhs.checked_mul(rhs).ok_or_else(overflow)?,
        Operation::And => lhs & rhs,
        Operation::Or => lhs | rhs,
        Operation::Set => lhs,
        Operation::Eq => i64::from(lhs == rhs),
        Operation::Gt => i64::from(lhs > rhs),
    };
    Ok(result)
}

/// Execute the instruction at `state[ip]`, write its result and advance the instruction pointer
pub fn step(program: &Program, state: &mut ConcreteState) -> Result<(), EngineError> {
    let ip_register = program.ip_register();
    let ip = state[ip_register];
    let instruction = program.fetch(ip).ok_or(EngineError::IpOutOfRange {
        ip,
        len: program.len(),
    })?;

    let value = evaluate_concrete(instruction, state)?;
    state[destination(instruction)?] = value;

    state[ip_register] = state[ip_register]
        .checked_add(1)
        .ok_or_else(|| EngineError::ArithmeticOverflow {
            opcode: instruction.opcode.to_string(),
        })?;
    Ok(())
}

/// Outcome of a plain concrete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteRun {
    pub state: ConcreteState,
    pub steps: u64,
    /// The instruction pointer left the program
    pub halted: bool,
}

/// Single-step until the instruction pointer leaves the program or `limit` steps elapse
pub fn run_concrete(
    program: &Program,
    mut state: ConcreteState,
    limit: u64,
) -> Result<ConcreteRun, EngineError> {
    let ip_register = program.ip_register();
    let mut steps = 0;

    while steps < limit && program.contains(state[ip_register]) {
        step(program, &mut state)?;
        steps += 1;
    }

    let halted = !program.contains(state[ip_register]);
    Ok(ConcreteRun {
        state,
        steps,
        halted,
    })
}
