mod display;
pub mod operand;
pub mod ops;
#[cfg(test)]
mod tests;

use crate::ConcolicError;
use crate::context::ConcolicContext;
use crate::solver::concretize::ConcreteValue;
use operand::IntoOperand;
use ops::{BinaryOp, Operator, UnaryOp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument, trace};
use z3::ast::{Ast, Bool, Dynamic, Int};
use z3::{DeclKind, SortKind};

/// The sorts a fresh symbolic input may be created with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueSort {
    #[default]
    Int,
    Bool,
}

impl ValueSort {
    /// The [ValueSort] of a z3 term, if it is one the core models.
    pub fn of(expr: &Dynamic) -> Option<Self> {
        match expr.sort_kind() {
            SortKind::Int => Some(ValueSort::Int),
            SortKind::Bool => Some(ValueSort::Bool),
            _ => None,
        }
    }
}

/// A value that depends on symbolic input.
///
/// A [SymbolicValue] wraps exactly one z3 term and never changes after it is built.
/// Operators produce new values; evaluating a value against a model, or deciding a
/// branch on it, goes through a [ConcolicContext].
///
/// Equality and hashing compare the serialized term, so values can be used as map
/// keys. The symbolic `==` is [SymbolicValue::equals], which builds a constraint
/// instead of comparing.
#[derive(Clone)]
pub struct SymbolicValue {
    expr: Dynamic,
}

/// The outcome of applying an operator to a [SymbolicValue].
///
/// Operands of different sorts do not raise an error: the operator hands back
/// [Construction::SortMismatch], which is falsy. Callers that would rather fail at
/// the mismatch site can use [Construction::strict].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Construction {
    Value(SymbolicValue),
    SortMismatch {
        op: Operator,
        left: String,
        right: String,
    },
}

impl Construction {
    pub fn is_truthy(&self) -> bool {
        matches!(self, Construction::Value(_))
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Construction::SortMismatch { .. })
    }

    pub fn value(&self) -> Option<&SymbolicValue> {
        match self {
            Construction::Value(v) => Some(v),
            Construction::SortMismatch { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<SymbolicValue> {
        match self {
            Construction::Value(v) => Some(v),
            Construction::SortMismatch { .. } => None,
        }
    }

    /// Turn a sort mismatch into [ConcolicError::SortMismatch].
    pub fn strict(self) -> Result<SymbolicValue, ConcolicError> {
        match self {
            Construction::Value(v) => Ok(v),
            Construction::SortMismatch { op, left, right } => {
                Err(ConcolicError::SortMismatch { op, left, right })
            }
        }
    }
}

impl SymbolicValue {
    /// A fresh symbolic input named `name`. Two inputs with the same name and sort
    /// denote the same z3 constant.
    pub fn fresh<T: AsRef<str>>(name: T, sort: ValueSort) -> Self {
        let expr = match sort {
            ValueSort::Int => Dynamic::from_ast(&Int::new_const(name.as_ref())),
            ValueSort::Bool => Dynamic::from_ast(&Bool::new_const(name.as_ref())),
        };
        Self { expr }
    }

    pub fn int<T: AsRef<str>>(name: T) -> Self {
        Self::fresh(name, ValueSort::Int)
    }

    pub fn bool<T: AsRef<str>>(name: T) -> Self {
        Self::fresh(name, ValueSort::Bool)
    }

    pub fn wrap<T: Ast>(expr: &T) -> Self {
        Self {
            expr: Dynamic::from_ast(expr),
        }
    }

    pub fn expr(&self) -> &Dynamic {
        &self.expr
    }

    pub fn sort(&self) -> Option<ValueSort> {
        ValueSort::of(&self.expr)
    }

    /// Apply a binary operator with `self` on the left.
    ///
    /// Unimplemented operators fail before the operand is looked at. The operand is
    /// then lifted, and a sort mismatch between the two sides yields
    /// [Construction::SortMismatch].
    pub fn apply<T: IntoOperand>(&self, op: BinaryOp, rhs: T) -> Result<Construction, ConcolicError> {
        if !op.is_implemented() {
            return Err(ConcolicError::NotYetImplemented(op.into()));
        }
        let rhs = rhs.into_operand()?.lift();
        let (left, right) = (self.expr.get_sort(), rhs.get_sort());
        if left != right {
            trace!("{op} over mismatched sorts {left} and {right}");
            return Ok(Construction::SortMismatch {
                op: op.into(),
                left: left.to_string(),
                right: right.to_string(),
            });
        }
        let expr = op.build(&self.expr, &rhs)?;
        trace!("built {expr}");
        Ok(Construction::Value(SymbolicValue { expr }))
    }

    /// [SymbolicValue::apply], failing with [ConcolicError::SortMismatch] instead of
    /// returning the sentinel.
    pub fn apply_strict<T: IntoOperand>(
        &self,
        op: BinaryOp,
        rhs: T,
    ) -> Result<SymbolicValue, ConcolicError> {
        self.apply(op, rhs)?.strict()
    }

    pub fn apply_unary(&self, op: UnaryOp) -> Construction {
        match op.build(&self.expr) {
            Some(expr) => Construction::Value(SymbolicValue { expr }),
            None => Construction::SortMismatch {
                op: op.into(),
                left: self.expr.get_sort().to_string(),
                right: op.expected_sort().to_string(),
            },
        }
    }

    pub fn equals<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Equals, rhs)
    }

    pub fn not_equals<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::NotEquals, rhs)
    }

    pub fn lt<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Lt, rhs)
    }

    pub fn le<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Le, rhs)
    }

    pub fn gt<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Gt, rhs)
    }

    pub fn ge<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Ge, rhs)
    }

    pub fn add<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Add, rhs)
    }

    pub fn sub<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Sub, rhs)
    }

    pub fn mul<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Mul, rhs)
    }

    /// Integer division, rounding as z3's `div` does.
    pub fn div<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Div, rhs)
    }

    pub fn and<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::And, rhs)
    }

    pub fn or<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Or, rhs)
    }

    pub fn modulo<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Modulo, rhs)
    }

    pub fn xor<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Xor, rhs)
    }

    pub fn shl<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Shl, rhs)
    }

    pub fn shr<T: IntoOperand>(&self, rhs: T) -> Result<Construction, ConcolicError> {
        self.apply(BinaryOp::Shr, rhs)
    }

    pub fn not(&self) -> Construction {
        self.apply_unary(UnaryOp::Not)
    }

    pub fn neg(&self) -> Construction {
        self.apply_unary(UnaryOp::Neg)
    }

    /// Evaluate this value under the model held by the context's solver.
    ///
    /// The result is never cached: the model can change between calls. With model
    /// completion turned off, a value mentioning a variable the model leaves
    /// unassigned cannot be reduced to a constant and fails with
    /// [ConcolicError::EvaluationFailed].
    pub fn concretize(&self, ctx: &ConcolicContext) -> Result<Dynamic, ConcolicError> {
        let solver = ctx.solver().ok_or(ConcolicError::NoSolverInstalled)?;
        if !solver.has_model() {
            return Err(ConcolicError::NoModelAvailable);
        }
        let val = solver
            .eval(&self.expr, ctx.config().model_completion)
            .ok_or_else(|| ConcolicError::EvaluationFailed(self.to_string()))?;
        let residue = SymbolicValue { expr: val.clone() }.free_variable_names();
        if !residue.is_empty() {
            debug!("{self} evaluated to {val}, leaving {} unassigned", residue.join(", "));
            return Err(ConcolicError::EvaluationFailed(self.to_string()));
        }
        debug!("{self} := {val}");
        Ok(val)
    }

    pub fn concrete_value(&self, ctx: &ConcolicContext) -> Result<ConcreteValue, ConcolicError> {
        ConcreteValue::try_from(&self.concretize(ctx)?)
    }

    /// Decide a branch on this value.
    ///
    /// This is the call instrumented code makes wherever it would branch on a
    /// predicate. The value is concretized, must come back as a boolean constant, and
    /// the decision is reported to the context's branch oracle (if any) together with
    /// `self` before being returned.
    #[instrument(skip_all, fields(predicate = %self))]
    pub fn decide(&self, ctx: &mut ConcolicContext) -> Result<bool, ConcolicError> {
        let val = self.concretize(ctx)?;
        let decision = val
            .as_bool()
            .and_then(|b| b.as_bool())
            .ok_or_else(|| ConcolicError::NotABoolean(val.to_string()))?;
        ctx.report_branch(decision, self);
        Ok(decision)
    }

    /// The distinct free variables the term mentions, in order of first occurrence.
    pub fn free_variables(&self) -> Vec<SymbolicValue> {
        let mut seen: HashSet<Dynamic> = HashSet::new();
        let mut vars = vec![];
        let mut stack = vec![self.expr.clone()];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.clone()) {
                continue;
            }
            if node.is_const() {
                if node.decl().kind() == DeclKind::UNINTERPRETED {
                    vars.push(SymbolicValue { expr: node });
                }
                continue;
            }
            if !node.is_app() {
                continue;
            }
            // reversed so that the leftmost child is visited first
            stack.extend(node.children().into_iter().rev());
        }
        vars
    }

    pub fn free_variable_names(&self) -> Vec<String> {
        self.free_variables()
            .iter()
            .map(|v| v.expr.decl().name())
            .collect()
    }
}
