//! Shared programs and patterns for the acceleration tests

use crate::accel::pattern::Pattern;
use crate::ir::Program;
use crate::parser::parse_program_string;
use crate::semantics::smt::register_variable;
use crate::semantics::{RegisterFile, SymbolicState, Value};
use z3::ast::Int;

/// Instruction pointer value at the back edge of `counting_program`
pub const COUNTER_LOOP_HEAD: i64 = 4;

/// `r1` counts up to `bound`, then the program jumps past its end
///
/// ```text
/// 0: seti 0 0 1      r1 = 0
/// 1: addi 1 1 1      r1 += 1
/// 2: eqri 1 B 2      r2 = r1 == B
/// 3: addr 2 0 0      skip next when r2
/// 4: seti 0 0 0      back to 1
/// 5: seti 99 0 0     halt
/// ```
pub fn counting_program(bound: i64) -> Program {
    let text = format!(
        "#ip 0\nseti 0 0 1\naddi 1 1 1\neqri 1 {} 2\naddr 2 0 0\nseti 0 0 0\nseti 99 0 0",
        bound
    );
    parse_program_string(&text, "counting".to_string()).unwrap()
}

fn template(r1: Int) -> SymbolicState {
    RegisterFile([
        Value::Int(COUNTER_LOOP_HEAD),
        Value::from_ast(r1),
        Value::Int(0),
        Value::Symbolic(register_variable(3)),
        Value::Symbolic(register_variable(4)),
        Value::Symbolic(register_variable(5)),
    ])
}

/// Hand-written loop pattern: `[4, x1, 0, x3, x4, x5]`, guard `x1 <= bound`, shift `r1 += 1`
pub fn counter_pattern(bound: i64) -> Pattern {
    let guard = register_variable(1).le(&Int::from_i64(bound));
    Pattern::new(template(register_variable(1)), guard, [0, 1, 0, 0, 0, 0])
}

/// Like `counter_pattern` but `r1 = 2*x1`, which moves by 2 per unit of `x1`
/// while the shift claims 1
pub fn doubling_pattern(bound: i64) -> Pattern {
    let x1 = register_variable(1);
    let guard = x1.le(&Int::from_i64(bound));
    let doubled = Int::mul(&[&Int::from_i64(2), &x1]);
    Pattern::new(template(doubled), guard, [0, 1, 0, 0, 0, 0])
}
