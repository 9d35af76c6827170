//! Flavour density matrices and the flat mixing-angle state vector.

use serde::{Deserialize, Serialize};

use crate::{
    Float,
    core::{
        matrix::{C64, Matrix2},
        species::{Branch, Flavor, NM, NS, Species},
    },
    physics::{
        basis::{MixingAngles, NY},
        grid::EnergyGrid,
    },
};

/// Flavour-basis density matrix of every (species, energy bin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorField {
    data: [Vec<Matrix2>; NM],
}

impl FlavorField {
    pub fn zeros(ne: usize) -> Self {
        Self {
            data: [vec![Matrix2::zeros(); ne], vec![Matrix2::zeros(); ne]],
        }
    }

    /// Initial state from diagonal occupations `occupation(species, flavour,
    /// energy [erg])`.
    ///
    /// `mixing` tilts the polarisation vector of each bin away from the flavour
    /// axis: the off-diagonal element becomes `mixing · (f_ee − f_μμ) / 2` and
    /// the diagonal difference shrinks so the eigenvalues are unchanged.
    pub fn from_occupations<F>(grid: &EnergyGrid, mixing: Float, mut occupation: F) -> Self
    where
        F: FnMut(Species, Flavor, Float) -> Float,
    {
        let mixing = mixing.clamp(-1.0, 1.0);
        let mut field = Self::zeros(grid.len());
        for species in Species::ALL {
            for i in 0..grid.len() {
                let e = grid.energy(i);
                let fee = occupation(species, Flavor::E, e);
                let fmm = occupation(species, Flavor::Mu, e);
                let mean = 0.5 * (fee + fmm);
                let pz = fee - fmm;
                let tilted = 0.5 * pz * (1.0 - mixing * mixing).sqrt();
                *field.get_mut(species, i) =
                    Matrix2::hermitian(mean + tilted, mean - tilted, C64::new(0.5 * mixing * pz, 0.0));
            }
        }
        field
    }

    pub fn len(&self) -> usize {
        self.data[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.data[0].is_empty()
    }

    pub fn get(&self, species: Species, i: usize) -> &Matrix2 {
        &self.data[species.index()][i]
    }

    pub fn get_mut(&mut self, species: Species, i: usize) -> &mut Matrix2 {
        &mut self.data[species.index()][i]
    }

    pub fn species(&self, species: Species) -> &[Matrix2] {
        &self.data[species.index()]
    }

    /// Total number densities `(n, n̄)` [cm⁻³].
    pub fn number_densities(&self, grid: &EnergyGrid) -> (Float, Float) {
        let density = |species: Species| -> Float {
            self.species(species)
                .iter()
                .enumerate()
                .map(|(i, f)| f.trace().re * grid.phase_space(i))
                .sum()
        };
        (density(Species::Matter), density(Species::Antimatter))
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(Matrix2::is_finite)
    }
}

/// Index map of the flat mixing-angle vector, ordered
/// `[species][bin][branch][component]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixingLayout {
    ne: usize,
}

impl MixingLayout {
    pub fn new(ne: usize) -> Self {
        Self { ne }
    }

    pub fn ne(&self) -> usize {
        self.ne
    }

    /// Length of the flat vector.
    pub fn len(&self) -> usize {
        NM * self.ne * NS * NY
    }

    pub fn is_empty(&self) -> bool {
        self.ne == 0
    }

    pub fn offset(&self, species: Species, i: usize, branch: Branch) -> usize {
        ((species.index() * self.ne + i) * NS + branch.index()) * NY
    }

    pub fn angles(&self, y: &[Float], species: Species, i: usize, branch: Branch) -> MixingAngles {
        let o = self.offset(species, i, branch);
        let mut a = [0.0; NY];
        a.copy_from_slice(&y[o..o + NY]);
        MixingAngles(a)
    }

    pub fn set(&self, y: &mut [Float], species: Species, i: usize, branch: Branch, angles: &MixingAngles) {
        let o = self.offset(species, i, branch);
        y[o..o + NY].copy_from_slice(&angles.0);
    }

    /// Every slot in the identity configuration.
    pub fn identity(&self) -> Vec<Float> {
        MixingAngles::IDENTITY.0.repeat(NM * self.ne * NS)
    }

    /// Combined S-matrix `S_msw · S_si` of one bin.
    pub fn s_matrix(&self, y: &[Float], species: Species, i: usize) -> Matrix2 {
        self.angles(y, species, i, Branch::Msw).s_matrix()
            * self.angles(y, species, i, Branch::Si).s_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilt_preserves_eigenvalues() {
        let grid = EnergyGrid::uniform(2, 5.0, 15.0).unwrap();
        let field = FlavorField::from_occupations(&grid, 0.3, |_, f, _| match f {
            Flavor::E => 0.8,
            Flavor::Mu => 0.2,
        });
        let f = field.get(Species::Antimatter, 1);
        assert!((f.trace().re - 1.0).abs() < 1e-15);
        assert!((f.det().re - 0.8 * 0.2).abs() < 1e-15);
        assert!((f[(0, 1)].re - 0.5 * 0.3 * 0.6).abs() < 1e-15);
    }

    #[test]
    fn layout_slots_are_disjoint() {
        let layout = MixingLayout::new(3);
        let mut seen = vec![false; layout.len()];
        for s in Species::ALL {
            for i in 0..3 {
                for b in Branch::ALL {
                    let o = layout.offset(s, i, b);
                    for j in 0..NY {
                        assert!(!seen[o + j]);
                        seen[o + j] = true;
                    }
                }
            }
        }
        assert!(seen.into_iter().all(|x| x));
    }

    #[test]
    fn identity_vector_round_trips() {
        let layout = MixingLayout::new(2);
        let y = layout.identity();
        assert_eq!(y.len(), layout.len());
        let a = layout.angles(&y, Species::Antimatter, 1, Branch::Si);
        assert_eq!(a, MixingAngles::IDENTITY);
    }
}
