//! Instruction and program definitions for the IR

use crate::error::EngineError;
use crate::ir::types::{Opcode, OperandKind, REGISTER_COUNT};
use std::fmt;

/// One machine instruction: `opcode a b c`, where `c` is always the destination register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub opcode: Opcode,
    pub a: i64,
    pub b: i64,
    pub c: usize,
}

impl Instruction {
    /// Build an instruction, checking every register operand is a valid index
    pub fn new(opcode: Opcode, a: i64, b: i64, c: i64) -> Result<Self, EngineError> {
        let (kind_a, kind_b) = opcode.operand_kinds();
        for (kind, value) in [(kind_a, a), (kind_b, b), (OperandKind::Register, c)] {
            if kind == OperandKind::Register && !is_register_index(value) {
                return Err(EngineError::RegisterOutOfRange {
                    index: value,
                    opcode: opcode.to_string(),
                });
            }
        }

        Ok(Self {
            opcode,
            a,
            b,
            c: c as usize,
        })
    }
}

fn is_register_index(value: i64) -> bool {
    (0..REGISTER_COUNT as i64).contains(&value)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.opcode, self.a, self.b, self.c)
    }
}

/// An immutable program together with its instruction-pointer register binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    ip_register: usize,
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(ip_register: usize, instructions: Vec<Instruction>) -> Result<Self, EngineError> {
        if ip_register >= REGISTER_COUNT {
            return Err(EngineError::RegisterOutOfRange {
                index: ip_register as i64,
                opcode: "#ip".to_string(),
            });
        }

        Ok(Self {
            ip_register,
            instructions,
        })
    }

    /// Index of the register bound to the instruction pointer
    pub fn ip_register(&self) -> usize {
        self.ip_register
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at `ip`, or None when ip points outside the program
    pub fn fetch(&self, ip: i64) -> Option<&Instruction> {
        usize::try_from(ip).ok().and_then(|i| self.instructions.get(i))
    }

    pub fn contains(&self, ip: i64) -> bool {
        self.fetch(ip).is_some()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#ip {}", self.ip_register)?;
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_operands_are_validated() {
        assert!(Instruction::new(Opcode::Addr, 0, 5, 1).is_ok());
        assert!(matches!(
            Instruction::new(Opcode::Addr, 0, 6, 1),
            Err(EngineError::RegisterOutOfRange { index: 6, .. })
        ));
        assert!(Instruction::new(Opcode::Seti, 10551264, 0, 2).is_ok());
        assert!(Instruction::new(Opcode::Seti, 1, 0, 7).is_err());
        // b is unused for setr, so any value is accepted
        assert!(Instruction::new(Opcode::Setr, 3, 99, 0).is_ok());
        // a is an immediate for eqir
        assert!(Instruction::new(Opcode::Eqir, 256, 4, 0).is_ok());
        assert!(Instruction::new(Opcode::Eqir, 256, 6, 0).is_err());
    }

    #[test]
    fn test_fetch_bounds() {
        let program = Program::new(
            0,
            vec![Instruction::new(Opcode::Seti, 0, 0, 1).unwrap()],
        )
        .unwrap();
        assert!(program.contains(0));
        assert!(!program.contains(1));
        assert!(!program.contains(-1));
        assert!(Program::new(6, vec![]).is_err());
    }

    #[test]
    fn test_display() {
        let instr = Instruction::new(Opcode::Eqri, 1, 10, 2).unwrap();
        assert_eq!(instr.to_string(), "eqri 1 10 2");
    }
}
