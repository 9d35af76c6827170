//! Adiabatic-basis quantum kinetics for two-flavour neutrinos.
//!
//! The crate follows the flavour density matrices of neutrinos and
//! antineutrinos in a homogeneous, isotropic box for a set of energy bins.
//! Three effects act at once:
//!
//! - vacuum and matter (MSW) oscillation,
//! - forward scattering off the neutrino background (self-interaction),
//! - emission and absorption by the matter background.
//!
//! Oscillations are integrated as mixing-angle variables of unitary
//! S-matrices in the adiabatic basis with an embedded Cash-Karp Runge-Kutta
//! pair. Collisions are applied with a predictor-corrector step on the
//! flavour-basis density matrix. Both error sources share one step-size
//! controller.
//!
//! ```ignore
//! use sqa::prelude::*;
//!
//! let grid = EnergyGrid::uniform(2, 5.0, 20.0)?;
//! let vacuum = VacuumParameters::builder().dm21(7.4e-5).theta12(33.8).build();
//! let fluid = Fluid::new(1.0e6, 10.0, 0.3);
//! let problem = Problem::new(grid, vacuum, fluid);
//! let settings = Settings::builder().rmax(1.0e7).accuracy(1e-8).build();
//! let f0 = FlavorField::from_occupations(&problem.grid, 0.0, |s, f, _| match (s, f) {
//!     (Species::Matter, Flavor::E) => 0.5,
//!     _ => 0.1,
//! });
//! let medium = ThermalMedium::default();
//! let evolution = evolve(&medium, &problem, f0, &mut NoOutput, settings)?;
//! ```

pub mod constants;
pub mod core;
pub mod error;
pub mod methods;
pub mod physics;
pub mod prelude;
pub mod sqa;

pub use error::Error;

/// Floating point type used throughout the crate. Physical constants in cgs
/// units span well beyond the range of `f32`, so only double precision is
/// supported.
pub type Float = f64;
