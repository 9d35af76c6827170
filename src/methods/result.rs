//! Counters reported by the integrator.

use serde::{Deserialize, Serialize};

/// Number of right-hand-side evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evals {
    /// Derivative Function calls (one per Runge-Kutta stage)
    pub derivative: usize,
    /// Collision term evaluations (predictor and corrector)
    pub interaction: usize,
}

impl Evals {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Step bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steps {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Bin resets performed by the Reset Policy
    pub resets: usize,
}

impl Steps {
    pub fn new() -> Self {
        Self::default()
    }
}
