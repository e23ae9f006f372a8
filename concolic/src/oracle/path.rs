use crate::oracle::BranchOracle;
use crate::{SymbolicValue, ValueSort};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use tracing::warn;
use z3::ast::Bool;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch {
    pub decision: bool,
    pub predicate: SymbolicValue,
}

impl Branch {
    /// The predicate in the direction the run took.
    pub fn taken(&self) -> Option<Bool> {
        let predicate = self.predicate.expr().as_bool()?;
        Some(match self.decision {
            true => predicate,
            false => predicate.not(),
        })
    }

    /// The predicate in the direction the run did not take.
    pub fn not_taken(&self) -> Option<Bool> {
        Some(self.taken()?.not())
    }
}

/// The path constraint of a single concolic run, built up one branch at a time.
///
/// Install it as the [BranchOracle] of a [ConcolicContext](crate::ConcolicContext)
/// and every [decide](SymbolicValue::decide) appends the taken side of its predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathConstraint {
    branches: Vec<Branch>,
}

impl PathConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn clear(&mut self) {
        self.branches.clear()
    }

    /// The conjunction of every recorded branch, as taken.
    pub fn constraint(&self) -> Bool {
        let terms: Vec<Bool> = self.branches.iter().filter_map(Branch::taken).collect();
        conjoin(&terms)
    }

    /// The constraint describing a run that follows this path up to branch `idx`
    /// and then goes the other way. `None` if there is no branch `idx`.
    pub fn flipped(&self, idx: usize) -> Option<Bool> {
        let branch = self.branches.get(idx)?;
        let mut terms: Vec<Bool> = self.branches[..idx]
            .iter()
            .filter_map(Branch::taken)
            .collect();
        terms.push(branch.not_taken()?);
        Some(conjoin(&terms))
    }
}

fn conjoin(terms: &[Bool]) -> Bool {
    match terms {
        [] => Bool::from_bool(true),
        [single] => single.clone(),
        _ => Bool::and(terms),
    }
}

impl BranchOracle for PathConstraint {
    fn which_branch(&mut self, decision: bool, discriminant: &SymbolicValue) {
        if discriminant.sort() != Some(ValueSort::Bool) {
            warn!("ignoring branch on non-boolean predicate {discriminant}");
            return;
        }
        self.branches.push(Branch {
            decision,
            predicate: discriminant.clone(),
        });
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.decision {
            true => write!(f, "{}", self.predicate),
            false => write!(f, "(not {})", self.predicate),
        }
    }
}

impl Display for PathConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.branches.is_empty() {
            return write!(f, "true");
        }
        write!(f, "{}", self.branches.iter().join(" && "))
    }
}
