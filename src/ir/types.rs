//! Core types for the register-machine IR

use std::fmt;

use crate::error::EngineError;

/// Number of registers in the machine
pub const REGISTER_COUNT: usize = 6;

/// How an instruction operand is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// The operand names a register
    Register,
    /// The operand is a literal value
    Immediate,
    /// The operand is ignored
    Unused,
}

/// The operation an opcode performs on its two inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Mul,
    And,
    Or,
    Set,
    Eq,
    Gt,
}

/// The sixteen opcodes of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Addr,
    Addi,
    Mulr,
    Muli,
    Banr,
    Bani,
    Borr,
    Bori,
    Setr,
    Seti,
    Gtir,
    Gtri,
    Gtrr,
    Eqir,
    Eqri,
    Eqrr,
}

impl Opcode {
    /// Every opcode, in mnemonic order
    pub const ALL: [Opcode; 16] = [
        Opcode::Addr,
        Opcode::Addi,
        Opcode::Mulr,
        Opcode::Muli,
        Opcode::Banr,
        Opcode::Bani,
        Opcode::Borr,
        Opcode::Bori,
        Opcode::Setr,
        Opcode::Seti,
        Opcode::Gtir,
        Opcode::Gtri,
        Opcode::Gtrr,
        Opcode::Eqir,
        Opcode::Eqri,
        Opcode::Eqrr,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Addr => "addr",
            Opcode::Addi => "addi",
            Opcode::Mulr => "mulr",
            Opcode::Muli => "muli",
            Opcode::Banr => "banr",
            Opcode::Bani => "bani",
            Opcode::Borr => "borr",
            Opcode::Bori => "bori",
            Opcode::Setr => "setr",
            Opcode::Seti => "seti",
            Opcode::Gtir => "gtir",
            Opcode::Gtri => "gtri",
            Opcode::Gtrr => "gtrr",
            Opcode::Eqir => "eqir",
            Opcode::Eqri => "eqri",
            Opcode::Eqrr => "eqrr",
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Opcode::Addr | Opcode::Addi => Operation::Add,
            Opcode::Mulr | Opcode::Muli => Operation::Mul,
            Opcode::Banr | Opcode::Bani => Operation::And,
            Opcode::Borr | Opcode::Bori => Operation::Or,
            Opcode::Setr | Opcode::Seti => Operation::Set,
            Opcode::Gtir | Opcode::Gtri | Opcode::Gtrr => Operation::Gt,
            Opcode::Eqir | Opcode::Eqri | Opcode::Eqrr => Operation::Eq,
        }
    }

    /// Operand kinds of `a` and `b`
    pub fn operand_kinds(&self) -> (OperandKind, OperandKind) {
        use OperandKind::{Immediate, Register, Unused};
        match self {
            Opcode::Addr | Opcode::Mulr | Opcode::Banr | Opcode::Borr | Opcode::Gtrr | Opcode::Eqrr => {
                (Register, Register)
            }
            Opcode::Addi | Opcode::Muli | Opcode::Bani | Opcode::Bori | Opcode::Gtri | Opcode::Eqri => {
                (Register, Immediate)
            }
            Opcode::Gtir | Opcode::Eqir => (Immediate, Register),
            Opcode::Setr => (Register, Unused),
            Opcode::Seti => (Immediate, Unused),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl std::str::FromStr for Opcode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic() == lowered)
            .ok_or_else(|| EngineError::UnknownOpcode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trips_through_mnemonic() {
        for op in Opcode::ALL {
            assert_eq!(op.mnemonic().parse::<Opcode>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            "divr".parse::<Opcode>(),
            Err(EngineError::UnknownOpcode("divr".to_string()))
        );
        assert!("eqii".parse::<Opcode>().is_err());
    }

    #[test]
    fn test_comparison_operand_kinds_follow_suffix() {
        assert_eq!(
            Opcode::Gtir.operand_kinds(),
            (OperandKind::Immediate, OperandKind::Register)
        );
        assert_eq!(
            Opcode::Eqri.operand_kinds(),
            (OperandKind::Register, OperandKind::Immediate)
        );
        assert_eq!(
            Opcode::Eqrr.operand_kinds(),
            (OperandKind::Register, OperandKind::Register)
        );
        assert_eq!(Opcode::Gtrr.operation(), Operation::Gt);
        assert_eq!(Opcode::Bori.operation(), Operation::Or);
    }
}
