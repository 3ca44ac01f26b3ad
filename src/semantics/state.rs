//! Register files shared by the concrete and symbolic interpreters

use crate::ir::REGISTER_COUNT;
use std::fmt;
use std::ops::{Index, IndexMut};
use z3::ast::{Ast, Int};

/// Six register slots holding either concrete integers or symbolic values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegisterFile<V>(pub [V; REGISTER_COUNT]);

/// Register file of plain integers
pub type ConcreteState = RegisterFile<i64>;

/// Register file whose slots may hold expressions over the free variables `x0..x5`
pub type SymbolicState = RegisterFile<Value>;

impl<V> RegisterFile<V> {
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.0.iter()
    }
}

impl ConcreteState {
    pub fn zeroed() -> Self {
        RegisterFile([0; REGISTER_COUNT])
    }
}

impl SymbolicState {
    /// Every slot holds an integer
    #[allow(dead_code)]
    pub fn is_concrete(&self) -> bool {
        self.0.iter().all(Value::is_concrete)
    }
}

impl From<&ConcreteState> for SymbolicState {
    fn from(state: &ConcreteState) -> Self {
        RegisterFile(state.0.map(Value::Int))
    }
}

impl<V> Index<usize> for RegisterFile<V> {
    type Output = V;

    fn index(&self, index: usize) -> &V {
        &self.0[index]
    }
}

impl<V> IndexMut<usize> for RegisterFile<V> {
    fn index_mut(&mut self, index: usize) -> &mut V {
        &mut self.0[index]
    }
}

impl<V: fmt::Display> fmt::Display for RegisterFile<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

/// A register value: a plain integer or a simplified Z3 integer term
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Symbolic(Int),
}

impl Value {
    /// Simplify a term and collapse it to `Value::Int` when it reduces to a numeral
    pub fn from_ast(expr: Int) -> Self {
        let simplified = expr.simplify();
        match simplified.as_i64() {
            Some(n) => Value::Int(n),
            None => Value::Symbolic(simplified),
        }
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Lift into a Z3 term
    pub fn to_ast(&self) -> Int {
        match self {
            Value::Int(n) => Int::from_i64(*n),
            Value::Symbolic(expr) => expr.clone(),
        }
    }
}

// Symbolic values are kept simplified, so their rendering is canonical.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Symbolic(a), Value::Symbolic(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Symbolic(expr) => write!(f, "{}", expr),
        }
    }
}
