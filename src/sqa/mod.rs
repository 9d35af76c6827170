//! Flavour evolution: the Derivative Function, collisions, resets and the
//! integration loop that ties them together.

pub mod context;
pub mod derivative;
pub mod integrator;
pub mod interact;
pub mod reset;
pub mod solout;
pub mod state;

use serde::{Deserialize, Serialize};

use crate::physics::{grid::EnergyGrid, medium::Fluid, vacuum::VacuumParameters};

/// Everything that defines a run apart from the medium model, the initial
/// state and the integrator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub grid: EnergyGrid,
    pub vacuum: VacuumParameters,
    pub fluid: Fluid,
}

impl Problem {
    pub fn new(grid: EnergyGrid, vacuum: VacuumParameters, fluid: Fluid) -> Self {
        Self { grid, vacuum, fluid }
    }
}
