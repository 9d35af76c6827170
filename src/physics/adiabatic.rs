//! Instantaneous adiabatic basis of the vacuum + MSW Hamiltonian.
//!
//! The eigenvectors of a 2×2 Hermitian `H` follow from the cofactors of
//! `k_j − H`: `|U_fj|² = C_j[f][f] / (k_j − k_other)`. Only the sign of each
//! element is left open; it is fixed by continuity with the vacuum mixing
//! matrix through the prefactor table `A`.

use crate::{
    Float,
    core::{
        matrix::{C64, Matrix2},
        species::{Flavor, NF, Species},
    },
    physics::vacuum::{Hierarchy, VacuumTables, shifted_cofactors},
};

/// Eigenvalues of `h` ordered to follow the vacuum mass states.
pub fn eigenvalues(h: &Matrix2, hierarchy: Hierarchy) -> [Float; NF] {
    let half_trace = 0.5 * h.trace().re;
    let split = h[(0, 0)].re - h[(1, 1)].re;
    let root = 0.5 * (split * split + 4.0 * h[(0, 1)].norm_sqr()).sqrt();
    let a = hierarchy.signs();
    [half_trace + a[0] * root, half_trace + a[1] * root]
}

/// `k_j − k_other` for each eigenvalue.
pub fn gaps(k: &[Float; NF]) -> [Float; NF] {
    [k[0] - k[1], k[1] - k[0]]
}

/// Cofactor matrices of `k_j − h`.
pub fn cofactor_matrices(h: &Matrix2, k: &[Float; NF]) -> [Matrix2; NF] {
    [shifted_cofactors(h, k[0]), shifted_cofactors(h, k[1])]
}

/// Sign prefactors at the current point. The electron row flips sign when
/// the off-diagonal cofactor has turned against its vacuum phase.
pub fn prefactors(
    c: &[Matrix2; NF],
    cv: &[Matrix2; NF],
    av: &[[Float; NF]; NF],
) -> [[Float; NF]; NF] {
    let (e, mu) = (Flavor::E.index(), Flavor::Mu.index());
    let mut a = *av;
    for j in 0..NF {
        if (c[j][(mu, e)] * cv[j][(mu, e)].conj()).re < 0.0 {
            a[j][e] = -av[j][e];
        }
        a[j][mu] = av[j][mu];
    }
    a
}

/// Mixing matrix from eigenvalue gaps, cofactors and prefactors.
pub fn mixing_matrix(dk: &[Float; NF], c: &[Matrix2; NF], a: &[[Float; NF]; NF]) -> Matrix2 {
    let mut u = Matrix2::zeros();
    for j in 0..NF {
        for f in 0..NF {
            let weight = (c[j][(f, f)].re / dk[j]).max(0.0);
            u[(f, j)] = C64::new(a[j][f] * weight.sqrt(), 0.0);
        }
    }
    u
}

/// Transform to the adiabatic basis at a reset point together with the
/// tables it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct AdiabaticBasis {
    /// Columns are the instantaneous eigenvectors in the flavour basis.
    pub u0: Matrix2,
    /// Cofactor matrices, one per eigenvalue.
    pub c0: [Matrix2; NF],
    /// Sign prefactors, `a0[j][flavour]`.
    pub a0: [[Float; NF]; NF],
    /// Eigenvalues [erg].
    pub k0: [Float; NF],
}

impl AdiabaticBasis {
    /// Diagonalise vacuum + MSW for one (species, bin) with the diagonal
    /// matter potential `v = [Ve, Vμ]`.
    ///
    /// Antineutrinos see `HfV̄ − V`. Its conjugate is built instead and the
    /// resulting transform conjugated back, so both species share the same
    /// real-valued machinery.
    pub fn new(vacuum: &VacuumTables, species: Species, i: usize, v: [Float; NF]) -> Self {
        let potential = Matrix2::real_diag(v[0], v[1]);
        let h = match species {
            Species::Matter => *vacuum.hfv(species, i) + potential,
            Species::Antimatter => (*vacuum.hfv(species, i) - potential).conj(),
        };

        let k0 = eigenvalues(&h, vacuum.hierarchy);
        let c0 = cofactor_matrices(&h, &k0);
        let a0 = prefactors(&c0, &vacuum.cv[i], &vacuum.av[i]);
        let u = mixing_matrix(&gaps(&k0), &c0, &a0);
        let u0 = match species {
            Species::Matter => u,
            Species::Antimatter => u.conj(),
        };

        Self { u0, c0, a0, k0 }
    }
}
