//! Collision term and its predictor-corrector application.

use crate::{
    Float,
    core::{
        matrix::Matrix2,
        species::{Flavor, Species},
    },
    physics::{
        grid::EnergyGrid,
        medium::{Fluid, Medium},
    },
    sqa::state::FlavorField,
};

/// `df/dr = E − ½{E + A, f}` for every (species, bin).
pub fn collision_term<M>(medium: &M, fluid: &Fluid, grid: &EnergyGrid, f: &FlavorField) -> FlavorField
where
    M: Medium + ?Sized,
{
    let mut dfdr = FlavorField::zeros(grid.len());
    for species in Species::ALL {
        for i in 0..grid.len() {
            let e = grid.energy(i);
            let rate = |flavor: Flavor| {
                (
                    medium.emissivity(fluid, species, flavor, e),
                    medium.absorption(fluid, species, flavor, e),
                )
            };
            let (eta_e, kappa_e) = rate(Flavor::E);
            let (eta_mu, kappa_mu) = rate(Flavor::Mu);
            let emission = Matrix2::real_diag(eta_e, eta_mu);
            let total = Matrix2::real_diag(eta_e + kappa_e, eta_mu + kappa_mu);
            *dfdr.get_mut(species, i) = emission - total.anticommutator(f.get(species, i)).scale(0.5);
        }
    }
    dfdr
}

/// Apply collisions to `f` with a trapezoidal predictor-corrector over the
/// interval `interval(species, bin)` [cm] and return the interaction error:
/// the largest difference between the predicted and the corrected state,
/// relative to the trace of the corrected state.
pub fn predictor_corrector<M, I>(
    medium: &M,
    fluid: &Fluid,
    grid: &EnergyGrid,
    f: &mut FlavorField,
    interval: I,
) -> Float
where
    M: Medium + ?Sized,
    I: Fn(Species, usize) -> Float,
{
    let dfdr0 = collision_term(medium, fluid, grid, f);
    let mut predicted = f.clone();
    for species in Species::ALL {
        for i in 0..grid.len() {
            *predicted.get_mut(species, i) += dfdr0.get(species, i).scale(interval(species, i));
        }
    }

    let dfdr1 = collision_term(medium, fluid, grid, &predicted);
    let mut error: Float = 0.0;
    for species in Species::ALL {
        for i in 0..grid.len() {
            let average = (*dfdr0.get(species, i) + *dfdr1.get(species, i)).scale(0.5);
            let corrected = f.get_mut(species, i);
            *corrected += average.scale(interval(species, i));

            let trace = corrected.trace().re;
            if trace > 0.0 {
                error = error.max(predicted.get(species, i).max_abs_diff(corrected) / trace);
            }
        }
    }
    error
}
