use crate::ConcolicConfig;
use crate::oracle::BranchOracle;
use crate::solver::ModelSource;
use crate::value::SymbolicValue;
use std::fmt::{Debug, Formatter};
use tracing::debug;

/// Everything a [SymbolicValue] needs from the surrounding engine to be evaluated:
/// the solver whose model gives it a concrete value, and the oracle that is told
/// about every branch decided on it.
///
/// A context lives for one concolic run. Both collaborators are optional and are
/// borrowed, so the engine keeps ownership and can inspect them once the run ends.
#[derive(Default)]
pub struct ConcolicContext<'a> {
    solver: Option<&'a dyn ModelSource>,
    oracle: Option<&'a mut dyn BranchOracle>,
    config: ConcolicConfig,
}

impl<'a> ConcolicContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConcolicConfig) -> Self {
        Self {
            solver: None,
            oracle: None,
            config,
        }
    }

    pub fn with_solver<S: ModelSource>(mut self, solver: &'a S) -> Self {
        self.install_solver(solver);
        self
    }

    pub fn with_oracle<O: BranchOracle>(mut self, oracle: &'a mut O) -> Self {
        self.install_oracle(oracle);
        self
    }

    pub fn install_solver<S: ModelSource>(&mut self, solver: &'a S) {
        self.solver = Some(solver);
    }

    pub fn remove_solver(&mut self) -> Option<&'a dyn ModelSource> {
        self.solver.take()
    }

    pub fn install_oracle<O: BranchOracle>(&mut self, oracle: &'a mut O) {
        self.oracle = Some(oracle);
    }

    pub fn remove_oracle(&mut self) -> Option<&'a mut dyn BranchOracle> {
        self.oracle.take()
    }

    pub fn solver(&self) -> Option<&'a dyn ModelSource> {
        self.solver
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    pub fn config(&self) -> &ConcolicConfig {
        &self.config
    }

    pub(crate) fn report_branch(&mut self, decision: bool, discriminant: &SymbolicValue) {
        if let Some(oracle) = self.oracle.as_deref_mut() {
            debug!("branch {decision} on {discriminant}");
            oracle.which_branch(decision, discriminant);
        }
    }
}

impl Debug for ConcolicContext<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcolicContext")
            .field("solver", &self.solver.is_some())
            .field("oracle", &self.oracle.is_some())
            .field("config", &self.config)
            .finish()
    }
}
