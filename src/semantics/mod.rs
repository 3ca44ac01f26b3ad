//! Instruction semantics for concrete and symbolic execution

pub mod concrete;
pub mod smt;
pub mod state;

pub use concrete::{run_concrete, step};
pub use smt::{step_symbolic, SolverConfig};
pub use state::{ConcreteState, RegisterFile, SymbolicState, Value};

use crate::error::EngineError;
use crate::ir::{Instruction, OperandKind, REGISTER_COUNT};

/// Resolve the `a` and `b` inputs of an instruction against a register file.
///
/// Immediates go through `literal`; unused operands read as `literal(0)`.
pub(crate) fn read_operands<V: Clone>(
    instruction: &Instruction,
    state: &RegisterFile<V>,
    literal: impl Fn(i64) -> V,
) -> Result<(V, V), EngineError> {
    let (kind_a, kind_b) = instruction.opcode.operand_kinds();
    let read = |kind: OperandKind, raw: i64| -> Result<V, EngineError> {
        match kind {
            OperandKind::Register => usize::try_from(raw)
                .ok()
                .filter(|&index| index < REGISTER_COUNT)
                .map(|index| state[index].clone())
                .ok_or_else(|| EngineError::RegisterOutOfRange {
                    index: raw,
                    opcode: instruction.opcode.to_string(),
                }),
            OperandKind::Immediate => Ok(literal(raw)),
            OperandKind::Unused => Ok(literal(0)),
        }
    };

    Ok((read(kind_a, instruction.a)?, read(kind_b, instruction.b)?))
}

/// Destination register of an instruction, checked against the register file size
pub(crate) fn destination(instruction: &Instruction) -> Result<usize, EngineError> {
    if instruction.c < REGISTER_COUNT {
        Ok(instruction.c)
    } else {
        Err(EngineError::RegisterOutOfRange {
            index: instruction.c as i64,
            opcode: instruction.opcode.to_string(),
        })
    }
}
