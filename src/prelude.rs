//! Convenient prelude: import the most commonly used traits, types, and functions.
//!
//! Bring this into scope with:
//!
//! ```rust
//! use sqa::prelude::*;
//! ```
//!
//! Re-exports included:
//! - Core traits and types: `ODE`, `Status`, `Matrix2`.
//! - Output hooks: `SolOut`, `ControlFlag`, `NoOutput`, `StrideRecorder`.
//! - Problem description: `EnergyGrid`, `VacuumParameters`, `Fluid`, `Medium`, `ThermalMedium`, `Problem`.
//! - High-level API: `evolve`, `Integrator`, `Evolution`, `Settings`, `ResetMode`.

pub use crate::core::{
    matrix::{C64, Matrix2},
    ode::ODE,
    species::{Branch, Flavor, Species},
    status::Status,
};
pub use crate::error::Error;
pub use crate::methods::{
    result::{Evals, Steps},
    settings::{ResetMode, Settings},
};
pub use crate::physics::{
    basis::MixingAngles,
    grid::EnergyGrid,
    medium::{Fluid, Medium, ThermalMedium},
    vacuum::{Hierarchy, VacuumParameters},
};
pub use crate::sqa::{
    Problem,
    integrator::{Evolution, Integrator, evolve},
    solout::{ControlFlag, NoOutput, SolOut, StrideRecorder},
    state::FlavorField,
};
