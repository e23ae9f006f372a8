use crate::ConcolicError;
use crate::value::operand::IntLiteral;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use z3::ast::{Bool, Dynamic, Int};

/// A native value read back out of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteValue {
    Int(IntLiteral),
    Bool(bool),
}

impl ConcreteValue {
    pub fn int<T: Into<IntLiteral>>(value: T) -> Self {
        ConcreteValue::Int(value.into())
    }

    pub fn as_int(&self) -> Option<IntLiteral> {
        match self {
            ConcreteValue::Int(i) => Some(*i),
            ConcreteValue::Bool(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_int()?.as_i64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConcreteValue::Bool(b) => Some(*b),
            ConcreteValue::Int(_) => None,
        }
    }

    /// The constant term denoting this value.
    pub fn to_expr(&self) -> Dynamic {
        match self {
            ConcreteValue::Int(i) => Dynamic::from_ast(&i.to_int()),
            ConcreteValue::Bool(b) => Dynamic::from_ast(&Bool::from_bool(*b)),
        }
    }
}

/// Read an integer numeral of any size. z3 only hands out numerals as machine
/// integers up to 64 bits, so anything wider is read from its SMT-LIB text,
/// either `digits` or `(- digits)`.
fn numeral(value: &Int) -> Option<IntLiteral> {
    if let Some(i) = value.as_i64() {
        return Some(i.into());
    }
    if let Some(u) = value.as_u64() {
        return Some(u.into());
    }
    let text = value.to_string();
    let (negative, digits) = match text.strip_prefix("(- ") {
        Some(rest) => (true, rest.strip_suffix(')')?),
        None => (false, text.as_str()),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(IntLiteral::from_parts(negative, digits.parse().ok()?))
}

impl TryFrom<&Dynamic> for ConcreteValue {
    type Error = ConcolicError;

    fn try_from(value: &Dynamic) -> Result<Self, Self::Error> {
        if let Some(b) = value.as_bool().and_then(|b| b.as_bool()) {
            return Ok(ConcreteValue::Bool(b));
        }
        if let Some(i) = value.as_int().as_ref().and_then(numeral) {
            return Ok(ConcreteValue::Int(i));
        }
        Err(ConcolicError::NotAConstant(value.to_string()))
    }
}

impl Display for ConcreteValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConcreteValue::Int(i) => write!(f, "{i}"),
            ConcreteValue::Bool(b) => write!(f, "{b}"),
        }
    }
}
