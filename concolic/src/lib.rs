mod config;
mod context;
mod error;
pub mod oracle;
pub mod solver;
pub mod value;

pub use z3;

pub use config::ConcolicConfig;
pub use context::ConcolicContext;
pub use error::ConcolicError;
pub use oracle::BranchOracle;
pub use oracle::path::{Branch, PathConstraint};
pub use solver::concretize::ConcreteValue;
pub use solver::{ConcolicSolver, ModelSource};
pub use value::operand::{IntLiteral, IntoOperand, Operand};
pub use value::ops::{BinaryOp, Operator, UnaryOp};
pub use value::{Construction, SymbolicValue, ValueSort};
