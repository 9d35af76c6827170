#![allow(dead_code)]

use sqa::prelude::*;

/// Vacuum parameters of the solar sector.
pub fn solar_vacuum() -> VacuumParameters {
    VacuumParameters::builder().dm21(7.4e-5).theta12(33.8).build()
}

/// Two bins at 10 and 20 MeV in a tenuous fluid.
pub fn two_bin_problem(vacuum: VacuumParameters) -> Problem {
    let grid = EnergyGrid::uniform(2, 5.0, 25.0).unwrap();
    Problem::new(grid, vacuum, Fluid::new(1.0, 10.0, 0.5))
}

/// Occupation scale that keeps the self-interaction potential well below
/// the vacuum splitting, so runs stay short.
pub const DILUTE: f64 = 1.0e-12;

/// Pure flavour states with electron excess, identical for both species.
pub fn initial_state(grid: &EnergyGrid, mixing: f64) -> FlavorField {
    FlavorField::from_occupations(grid, mixing, |_, flavor, _| match flavor {
        Flavor::E => 0.8 * DILUTE,
        Flavor::Mu => 0.2 * DILUTE,
    })
}

/// Dense gas with a neutrino excess: neutrinos with occupations `(0.5, 0.1)`
/// tilted by `mixing`, antineutrinos with eigenvalues `(0.2, 0.1)` and an
/// imaginary flavour coherence. The two polarisations are not parallel, so
/// the self-interaction potential precesses both species. It is of order
/// 1e2 rad/cm for two bins, so runs must stay well below a centimetre.
pub fn asymmetric_state(grid: &EnergyGrid, mixing: f64) -> FlavorField {
    let mut f = FlavorField::from_occupations(grid, mixing, |_, flavor, _| match flavor {
        Flavor::E => 0.5,
        Flavor::Mu => 0.1,
    });
    for i in 0..grid.len() {
        *f.get_mut(Species::Antimatter, i) = Matrix2::hermitian(0.15, 0.15, C64::new(0.0, 0.05));
    }
    f
}

/// Absorbing medium whose equilibrium occupations are far below the initial
/// ones.
pub fn absorbing_medium() -> ThermalMedium {
    ThermalMedium {
        opacity: [[1.0e-3, 5.0e-4], [1.0e-3, 5.0e-4]],
        reference_energy: 10.0,
        chemical_potential: [[-300.0; 2]; 2],
    }
}

pub fn trace(f: &FlavorField, species: Species, i: usize) -> f64 {
    f.get(species, i).trace().re
}
