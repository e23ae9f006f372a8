use crate::value::ops::Operator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConcolicError {
    #[error("Only integer literals and symbolic values can be lifted; got {0}")]
    UnsupportedOperandKind(String),
    #[error("{0} is not implemented yet")]
    NotYetImplemented(Operator),
    #[error("Operator {op} is not defined over sort {sort}")]
    InvalidOperandSort { op: Operator, sort: String },
    #[error("Operator {op} was applied to mismatched sorts {left} and {right}")]
    SortMismatch {
        op: Operator,
        left: String,
        right: String,
    },
    #[error("Concretization requires an installed solver")]
    NoSolverInstalled,
    #[error("The installed solver does not hold a model from its last check")]
    NoModelAvailable,
    #[error("The solver could not evaluate {0} under its current model")]
    EvaluationFailed(String),
    #[error("Expected a boolean constant in branch position, got {0}")]
    NotABoolean(String),
    #[error("Expected an integer or boolean constant, got {0}")]
    NotAConstant(String),
    #[error("z3 does not recognize the SMT logic {0}")]
    UnknownLogic(String),
}
