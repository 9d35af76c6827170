//! Vacuum mixing tables, evaluated once per run.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    Float,
    constants::EV,
    core::{
        matrix::{C64, Matrix2},
        species::{NF, NM, Species},
    },
    error::Error,
    physics::grid::EnergyGrid,
};

/// Vacuum oscillation parameters.
#[derive(Builder, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VacuumParameters {
    /// Lightest mass m1 [eV]
    #[builder(default = 0.0)]
    #[serde(default)]
    pub m1: Float,
    /// Mass-squared splitting Δm²₂₁ [eV²]; negative for an inverted ordering.
    pub dm21: Float,
    /// Vacuum mixing angle θ₁₂ [degrees]
    pub theta12: Float,
}

/// Ordering of the vacuum eigenvalues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hierarchy {
    Normal,
    Inverted,
}

impl Hierarchy {
    /// Sign attached to the square root of the discriminant for each
    /// eigenvalue, so eigenvalue `j` keeps following the same vacuum state.
    pub fn signs(self) -> [Float; NF] {
        match self {
            Hierarchy::Normal => [-1.0, 1.0],
            Hierarchy::Inverted => [1.0, -1.0],
        }
    }
}

/// Immutable per-bin vacuum quantities.
#[derive(Debug, Clone)]
pub struct VacuumTables {
    pub hierarchy: Hierarchy,
    /// Vacuum mixing matrix.
    pub uv: Matrix2,
    /// Vacuum eigenvalues [erg], `kv[i][j]`.
    pub kv: Vec<[Float; NF]>,
    /// Vacuum Hamiltonian in the flavour basis [erg], `hfv[species][i]`.
    pub hfv: [Vec<Matrix2>; NM],
    /// Cofactor matrices of `kV_j − HfV`, `cv[i][j]`.
    pub cv: Vec<[Matrix2; NF]>,
    /// Sign prefactors of the mixing matrix elements, `av[i][j][flavour]`.
    pub av: Vec<[[Float; NF]; NF]>,
}

impl VacuumTables {
    pub fn new(params: &VacuumParameters, grid: &EnergyGrid) -> Result<Self, Error> {
        if grid.is_empty() {
            return Err(Error::InvalidGrid("at least one energy bin is required".into()));
        }

        let m1sq = params.m1 * params.m1 * EV * EV;
        let m2sq = m1sq + params.dm21 * EV * EV;
        let kv: Vec<[Float; NF]> = (0..grid.len())
            .map(|i| {
                let e = grid.energy(i);
                [m1sq / (2.0 * e), m2sq / (2.0 * e)]
            })
            .collect();

        let hierarchy = if kv[0][1] > kv[0][0] {
            Hierarchy::Normal
        } else if kv[0][1] < kv[0][0] {
            Hierarchy::Inverted
        } else {
            return Err(Error::DegenerateHierarchy(kv[0][0]));
        };

        let (s, c) = params.theta12.to_radians().sin_cos();
        let uv = Matrix2::new([
            [C64::new(c, 0.0), C64::new(s, 0.0)],
            [C64::new(-s, 0.0), C64::new(c, 0.0)],
        ]);

        let hfv_matter: Vec<Matrix2> = kv
            .iter()
            .map(|k| uv.conjugate(&Matrix2::real_diag(k[0], k[1])))
            .collect();
        let hfv_anti: Vec<Matrix2> = hfv_matter.iter().map(Matrix2::conj).collect();

        let cv: Vec<[Matrix2; NF]> = hfv_matter
            .iter()
            .zip(&kv)
            .map(|(h, k)| [shifted_cofactors(h, k[0]), shifted_cofactors(h, k[1])])
            .collect();

        // signs reproducing UV from the cofactor construction
        let mut sign = [[1.0; NF]; NF];
        for j in 0..NF {
            for f in 0..NF {
                if uv[(f, j)].re < 0.0 {
                    sign[j][f] = -1.0;
                }
            }
        }
        let av = vec![sign; grid.len()];

        Ok(Self {
            hierarchy,
            uv,
            kv,
            hfv: [hfv_matter, hfv_anti],
            cv,
            av,
        })
    }

    pub fn hfv(&self, species: Species, i: usize) -> &Matrix2 {
        &self.hfv[species.index()][i]
    }
}

/// Cofactors of `k·I − H`.
pub fn shifted_cofactors(h: &Matrix2, k: Float) -> Matrix2 {
    (Matrix2::real_diag(k, k) - *h).cofactors()
}
