use crate::value::{SymbolicValue, ValueSort};
use crate::ConcolicError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use z3::ast::{Ast, Dynamic, Int};

/// Anything that can stand on the right-hand side of a symbolic operator.
///
/// Only two kinds of operand are understood: values that are already symbolic,
/// and integer literals. Everything else is rejected before it reaches an
/// operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Symbolic(SymbolicValue),
    Integer(IntLiteral),
}

impl Operand {
    /// Produce the z3 term for this operand. Literals become integer constants.
    pub fn lift(&self) -> Dynamic {
        match self {
            Operand::Symbolic(s) => s.expr().clone(),
            Operand::Integer(i) => Dynamic::from_ast(&i.to_int()),
        }
    }
}

/// An integer literal of any native width, kept as sign and magnitude so that every
/// `i128` and every `u128` is representable. Zero is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntLiteral {
    negative: bool,
    magnitude: u128,
}

impl IntLiteral {
    pub(crate) fn from_parts(negative: bool, magnitude: u128) -> Self {
        Self {
            negative: negative && magnitude != 0,
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self.negative {
            false => i128::try_from(self.magnitude).ok(),
            true => 0i128.checked_sub_unsigned(self.magnitude),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|i| i64::try_from(i).ok())
    }

    /// The z3 numeral with this value. Literals past 64 bits are assembled from
    /// 32-bit limbs and folded back into a single numeral.
    pub fn to_int(&self) -> Int {
        if let Some(i) = self.as_i64() {
            return Int::from_i64(i);
        }
        if let (false, Ok(u)) = (self.negative, u64::try_from(self.magnitude)) {
            return Int::from_u64(u);
        }
        let base = Int::from_u64(1 << 32);
        let magnitude = (0..4).rev().fold(Int::from_u64(0), |acc, limb| {
            let digit = Int::from_u64(((self.magnitude >> (32 * limb)) & 0xffff_ffff) as u64);
            Int::add(&[Int::mul(&[acc, base.clone()]), digit])
        });
        match self.negative {
            true => magnitude.unary_minus().simplify(),
            false => magnitude.simplify(),
        }
    }
}

macro_rules! int_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for IntLiteral {
                fn from(value: $t) -> Self {
                    Self::from_parts(value < 0, (value as i128).unsigned_abs())
                }
            }
        )*
    };
}

macro_rules! unsigned_int_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for IntLiteral {
                fn from(value: $t) -> Self {
                    Self::from_parts(false, value as u128)
                }
            }
        )*
    };
}

int_literal!(i8, i16, i32, i64, isize, i128);
unsigned_int_literal!(u8, u16, u32, u64, usize, u128);

impl Display for IntLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.negative {
            true => write!(f, "-{}", self.magnitude),
            false => write!(f, "{}", self.magnitude),
        }
    }
}

/// Fallible conversion into an [Operand], used by every operator on
/// [SymbolicValue]. Conversion errors surface as
/// [ConcolicError::UnsupportedOperandKind].
pub trait IntoOperand {
    fn into_operand(self) -> Result<Operand, ConcolicError>;
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Result<Operand, ConcolicError> {
        Ok(self)
    }
}

impl IntoOperand for SymbolicValue {
    fn into_operand(self) -> Result<Operand, ConcolicError> {
        Ok(Operand::Symbolic(self))
    }
}

impl IntoOperand for &SymbolicValue {
    fn into_operand(self) -> Result<Operand, ConcolicError> {
        Ok(Operand::Symbolic(self.clone()))
    }
}

/// Raw z3 terms are accepted only when their sort is one the core models.
impl IntoOperand for Dynamic {
    fn into_operand(self) -> Result<Operand, ConcolicError> {
        match ValueSort::of(&self) {
            Some(_) => Ok(Operand::Symbolic(SymbolicValue::wrap(&self))),
            None => Err(ConcolicError::UnsupportedOperandKind(format!(
                "a term of sort {}",
                self.get_sort()
            ))),
        }
    }
}

impl IntoOperand for &Dynamic {
    fn into_operand(self) -> Result<Operand, ConcolicError> {
        self.clone().into_operand()
    }
}

impl TryFrom<Dynamic> for Operand {
    type Error = ConcolicError;

    fn try_from(value: Dynamic) -> Result<Self, Self::Error> {
        value.into_operand()
    }
}

macro_rules! integer_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(value: $t) -> Self {
                    Operand::Integer(IntLiteral::from(value))
                }
            }

            impl IntoOperand for $t {
                fn into_operand(self) -> Result<Operand, ConcolicError> {
                    Ok(Operand::from(self))
                }
            }
        )*
    };
}

integer_operand!(i8, i16, i32, i64, isize, i128, u8, u16, u32, u64, usize, u128);

impl From<SymbolicValue> for Operand {
    fn from(value: SymbolicValue) -> Self {
        Operand::Symbolic(value)
    }
}

impl From<&SymbolicValue> for Operand {
    fn from(value: &SymbolicValue) -> Self {
        Operand::Symbolic(value.clone())
    }
}
