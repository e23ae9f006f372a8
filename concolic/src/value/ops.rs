use crate::ConcolicError;
use std::fmt::{Display, Formatter};
use z3::ast::{Ast, Bool, Dynamic, Int};

/// The binary operators a [SymbolicValue](crate::SymbolicValue) can be combined with.
///
/// `Modulo`, `Xor`, `Shl` and `Shr` are part of the operator set so that callers can
/// name them, but building any of them always fails with
/// [ConcolicError::NotYetImplemented]. `Equals` and `NotEquals` compare integers
/// only; relating two booleans is spelled with `And`, `Or` and `Not`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Equals,
    NotEquals,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Modulo,
    Xor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Binary(BinaryOp),
    Unary(UnaryOp),
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 16] = [
        BinaryOp::Equals,
        BinaryOp::NotEquals,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Gt,
        BinaryOp::Ge,
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Modulo,
        BinaryOp::Xor,
        BinaryOp::Shl,
        BinaryOp::Shr,
    ];

    pub fn is_implemented(&self) -> bool {
        !matches!(
            self,
            BinaryOp::Modulo | BinaryOp::Xor | BinaryOp::Shl | BinaryOp::Shr
        )
    }

    /// Build the z3 term for `lhs <op> rhs`. Both sides are assumed to share a sort;
    /// an operator that is undefined on that sort is an [ConcolicError::InvalidOperandSort].
    pub(crate) fn build(&self, lhs: &Dynamic, rhs: &Dynamic) -> Result<Dynamic, ConcolicError> {
        let built = match self {
            BinaryOp::Equals => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&l._eq(&r))),
            BinaryOp::NotEquals => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&l._eq(&r).not())),
            BinaryOp::Lt => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&l.lt(&r))),
            BinaryOp::Le => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&l.le(&r))),
            BinaryOp::Gt => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&l.gt(&r))),
            BinaryOp::Ge => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&l.ge(&r))),
            BinaryOp::Add => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&Int::add(&[l, r]))),
            BinaryOp::Sub => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&Int::sub(&[l, r]))),
            BinaryOp::Mul => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&Int::mul(&[l, r]))),
            BinaryOp::Div => ints(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&l.div(&r))),
            BinaryOp::And => bools(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&Bool::and(&[l, r]))),
            BinaryOp::Or => bools(lhs, rhs).map(|(l, r)| Dynamic::from_ast(&Bool::or(&[l, r]))),
            BinaryOp::Modulo | BinaryOp::Xor | BinaryOp::Shl | BinaryOp::Shr => {
                return Err(ConcolicError::NotYetImplemented((*self).into()));
            }
        };
        built.ok_or_else(|| ConcolicError::InvalidOperandSort {
            op: (*self).into(),
            sort: lhs.get_sort().to_string(),
        })
    }
}

impl UnaryOp {
    /// Build the z3 term for `<op> operand`, or `None` if the operand has the wrong sort.
    pub(crate) fn build(&self, operand: &Dynamic) -> Option<Dynamic> {
        match self {
            UnaryOp::Not => operand.as_bool().map(|b| Dynamic::from_ast(&b.not())),
            UnaryOp::Neg => operand.as_int().map(|i| Dynamic::from_ast(&i.unary_minus())),
        }
    }

    /// The sort name this operator expects its operand to have.
    pub(crate) fn expected_sort(&self) -> &'static str {
        match self {
            UnaryOp::Not => "Bool",
            UnaryOp::Neg => "Int",
        }
    }
}

fn ints(lhs: &Dynamic, rhs: &Dynamic) -> Option<(Int, Int)> {
    Some((lhs.as_int()?, rhs.as_int()?))
}

fn bools(lhs: &Dynamic, rhs: &Dynamic) -> Option<(Bool, Bool)> {
    Some((lhs.as_bool()?, rhs.as_bool()?))
}

impl From<BinaryOp> for Operator {
    fn from(value: BinaryOp) -> Self {
        Operator::Binary(value)
    }
}

impl From<UnaryOp> for Operator {
    fn from(value: UnaryOp) -> Self {
        Operator::Unary(value)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Modulo => "%",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        };
        write!(f, "{name}")
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Binary(b) => write!(f, "binary `{b}`"),
            Operator::Unary(u) => write!(f, "unary `{u}`"),
        }
    }
}
