//! Symbolic instruction semantics over Z3 integers

use crate::error::EngineError;
use crate::ir::{Instruction, Operation, Program, REGISTER_COUNT};
use crate::semantics::state::{RegisterFile, SymbolicState, Value};
use crate::semantics::{destination, read_operands};
use std::time::Duration;
use z3::ast::{Int, BV};
use z3::{Params, Solver};

/// Width used to express bitwise AND/OR over unbounded integers
const BITWISE_WIDTH: u32 = 64;

/// Configuration for the SMT solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Timeout for each query (None means no timeout)
    pub timeout: Option<Duration>,
}

impl SolverConfig {
    /// Create a config with a specific timeout in seconds
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(secs)),
        }
    }
}

/// Create a Z3 solver with the given configuration
pub fn create_solver_with_config(cfg: &SolverConfig) -> Solver {
    let solver = Solver::new();
    if let Some(timeout) = cfg.timeout {
        let mut params = Params::new();
        params.set_u32("timeout", timeout.as_millis() as u32);
        solver.set_params(&params);
    }
    solver
}

/// The free variable standing for the initial value of register `index`
pub fn register_variable(index: usize) -> Int {
    Int::new_const(format!("x{}", index))
}

/// One free variable per register, `x0..x5`
pub fn register_variables() -> [Int; REGISTER_COUNT] {
    std::array::from_fn(register_variable)
}

/// A symbolic register file seeded with the free variables, except the
/// instruction pointer slot which holds the concrete `ip`
pub fn fresh_symbolic_state(ip_register: usize, ip: i64) -> SymbolicState {
    let mut state = RegisterFile(register_variables().map(Value::Symbolic));
    state[ip_register] = Value::Int(ip);
    state
}

fn bitwise(lhs: &Int, rhs: &Int, op: Operation) -> Int {
    let lhs = BV::from_int(lhs, BITWISE_WIDTH);
    let rhs = BV::from_int(rhs, BITWISE_WIDTH);
    let result = match op {
        Operation::And => lhs.bvand(&rhs),
        _ => lhs.bvor(&rhs),
    };
    result.to_int(true)
}

/// Evaluate one instruction against a symbolic register file.
///
/// Integer inputs are folded directly. When an input is symbolic the result is
/// a simplified term; comparisons become `ite(cond, 1, 0)` rather than being
/// decided.
pub fn evaluate_symbolic(
    instruction: &Instruction,
    state: &SymbolicState,
) -> Result<Value, EngineError> {
    let (lhs, rhs) = read_operands(instruction, state, Value::Int)?;
    let op = instruction.opcode.operation();

    if let (Value::Int(l), Value::Int(r)) = (&lhs, &rhs) {
        let folded = match op {
            Operation::Add => l.checked_add(*r),
            Operation::Mul => l.checked_mul(*r),
            Operation::And => Some(l & r),
            Operation::Or => Some(l | r),
            Operation::Set => Some(*l),
            Operation::Eq => Some(i64::from(l == r)),
            Operation::Gt => Some(i64::from(l > r)),
        };
        return folded
            .map(Value::Int)
            .ok_or_else(|| EngineError::ArithmeticOverflow {
                opcode: instruction.opcode.to_string(),
            });
    }

    if op == Operation::Set {
        return Ok(lhs);
    }

    let (l, r) = (lhs.to_ast(), rhs.to_ast());
    let one = Int::from_i64(1);
    let zero = Int::from_i64(0);
    let expr = match op {
        Operation::Add => Int::add(&[&l, &r]),
        Operation::Mul => Int::mul(&[&l, &r]),
        Operation::And | Operation::Or => bitwise(&l, &r, op),
        Operation::Eq => l.eq(&r).ite(&one, &zero),
        Operation::Gt => l.gt(&r).ite(&one, &zero),
        Operation::Set => l,
    };
    Ok(Value::from_ast(expr))
}

/// Execute the instruction selected by the concrete `ip` on a symbolic register file.
///
/// The instruction pointer slot must hold an integer on entry. After the write it is
/// incremented symbolically, so a comparison result written to it leaves a term there.
pub fn step_symbolic(
    program: &Program,
    state: &mut SymbolicState,
    ip: i64,
) -> Result<(), EngineError> {
    let ip_register = program.ip_register();
    if let Value::Symbolic(expr) = &state[ip_register] {
        return Err(EngineError::InvalidIpType {
            register: ip_register,
            value: expr.to_string(),
        });
    }

    let instruction = program.fetch(ip).ok_or(EngineError::IpOutOfRange {
        ip,
        len: program.len(),
    })?;

    let value = evaluate_symbolic(instruction, state)?;
    state[destination(instruction)?] = value;

    state[ip_register] = match &state[ip_register] {
        Value::Int(n) => Value::Int(n.checked_add(1).ok_or_else(|| {
            EngineError::ArithmeticOverflow {
                opcode: instruction.opcode.to_string(),
            }
        })?),
        Value::Symbolic(expr) => Value::from_ast(Int::add(&[expr, &Int::from_i64(1)])),
    };
    Ok(())
}
