pub mod path;

use crate::SymbolicValue;

/// Receives every branch decided through [SymbolicValue::decide].
///
/// `decision` is the direction the concrete run took and `discriminant` is the
/// predicate it was decided on, so the oracle can record "this run took the
/// `decision` side of `discriminant`".
pub trait BranchOracle {
    fn which_branch(&mut self, decision: bool, discriminant: &SymbolicValue);
}

impl<F: FnMut(bool, &SymbolicValue)> BranchOracle for F {
    fn which_branch(&mut self, decision: bool, discriminant: &SymbolicValue) {
        self(decision, discriminant)
    }
}
