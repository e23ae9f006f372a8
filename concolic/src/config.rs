use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcolicConfig {
    /// Let z3 pick values for variables the model leaves unconstrained.
    pub model_completion: bool,
    /// SMT logic handed to z3 when a [ConcolicSolver](crate::ConcolicSolver) is built.
    pub logic: Option<String>,
    /// Per-check solver timeout in milliseconds. `None` leaves z3's default.
    pub timeout_ms: Option<u32>,
}

impl Default for ConcolicConfig {
    fn default() -> Self {
        Self {
            model_completion: true,
            logic: None,
            timeout_ms: None,
        }
    }
}
