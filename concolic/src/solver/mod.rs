pub mod concretize;

use crate::{ConcolicConfig, ConcolicError};
use tracing::debug;
use z3::ast::{Bool, Dynamic};
use z3::{Model, Params, SatResult, Solver};

/// A source of concrete values: something that may hold a model and can evaluate
/// terms under it.
pub trait ModelSource {
    /// Whether the last satisfiability check produced a model.
    fn has_model(&self) -> bool;

    /// Evaluate `expr` under the current model.
    fn eval(&self, expr: &Dynamic, model_completion: bool) -> Option<Dynamic>;
}

/// A bare model always has itself to evaluate against.
impl ModelSource for Model {
    fn has_model(&self) -> bool {
        true
    }

    fn eval(&self, expr: &Dynamic, model_completion: bool) -> Option<Dynamic> {
        Model::eval(self, expr, model_completion)
    }
}

/// A z3 [Solver] that remembers the outcome of its last [check](ConcolicSolver::check).
///
/// Only `check` changes the stored model; adding assertions afterwards leaves the
/// previous model in place until the next check.
#[derive(Debug)]
pub struct ConcolicSolver {
    solver: Solver,
    last_result: Option<SatResult>,
    model: Option<Model>,
}

impl Default for ConcolicSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcolicSolver {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            last_result: None,
            model: None,
        }
    }

    pub fn with_config(config: &ConcolicConfig) -> Result<Self, ConcolicError> {
        let solver = match &config.logic {
            Some(logic) => Solver::new_for_logic(logic.as_str())
                .ok_or_else(|| ConcolicError::UnknownLogic(logic.clone()))?,
            None => Solver::new(),
        };
        if let Some(timeout) = config.timeout_ms {
            let mut p = Params::new();
            p.set_u32("timeout", timeout);
            solver.set_params(&p);
        }
        Ok(Self {
            solver,
            last_result: None,
            model: None,
        })
    }

    pub fn assert(&self, constraint: &Bool) {
        self.solver.assert(constraint);
    }

    pub fn check(&mut self) -> SatResult {
        let result = self.solver.check();
        self.model = match result {
            SatResult::Sat => self.solver.get_model(),
            SatResult::Unsat | SatResult::Unknown => None,
        };
        debug!("solver check: {result:?}");
        self.last_result = Some(result);
        result
    }

    pub fn push(&self) {
        self.solver.push();
    }

    pub fn pop(&self, n: u32) {
        self.solver.pop(n);
    }

    pub fn last_result(&self) -> Option<SatResult> {
        self.last_result
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }
}

impl ModelSource for ConcolicSolver {
    fn has_model(&self) -> bool {
        self.model.is_some()
    }

    fn eval(&self, expr: &Dynamic, model_completion: bool) -> Option<Dynamic> {
        self.model.as_ref()?.eval(expr, model_completion)
    }
}
