//! Tables shared by the Derivative Function and the Reset Policy.

use crate::{
    Float,
    core::{
        matrix::Matrix2,
        species::{NF, NM, Species},
    },
    physics::{adiabatic::AdiabaticBasis, vacuum::VacuumTables},
};

/// Per (species, energy bin) state that only changes on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct BinContext {
    pub basis: AdiabaticBasis,
    /// Distance of the last reset of this bin [cm].
    pub last_reset: Float,
}

impl BinContext {
    pub fn u0(&self) -> &Matrix2 {
        &self.basis.u0
    }
}

/// Vacuum tables plus the adiabatic basis of every bin.
#[derive(Debug, Clone)]
pub struct SqaContext {
    pub vacuum: VacuumTables,
    bins: [Vec<BinContext>; NM],
}

impl SqaContext {
    /// Build every bin's basis at `r = 0` for the matter potential `v`.
    pub fn new(vacuum: VacuumTables, v: [Float; NF]) -> Self {
        let ne = vacuum.kv.len();
        let build = |species: Species| -> Vec<BinContext> {
            (0..ne)
                .map(|i| BinContext {
                    basis: AdiabaticBasis::new(&vacuum, species, i, v),
                    last_reset: 0.0,
                })
                .collect()
        };
        let bins = [build(Species::Matter), build(Species::Antimatter)];
        Self { vacuum, bins }
    }

    pub fn ne(&self) -> usize {
        self.bins[0].len()
    }

    pub fn bin(&self, species: Species, i: usize) -> &BinContext {
        &self.bins[species.index()][i]
    }

    /// Regenerate the basis of one bin at distance `r`.
    pub fn rebuild(&mut self, species: Species, i: usize, v: [Float; NF], r: Float) {
        let basis = AdiabaticBasis::new(&self.vacuum, species, i, v);
        self.bins[species.index()][i] = BinContext { basis, last_reset: r };
    }
}
