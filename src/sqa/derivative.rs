//! Derivative Function: rate of change of every mixing-angle component.

use std::f64::consts::TAU;

use crate::{
    Float,
    constants::{HBARC, SQRT2_GF},
    core::{
        matrix::{C64, Matrix2},
        ode::ODE,
        species::{Branch, NF, NM, Species},
    },
    physics::{basis::MixingAngles, grid::EnergyGrid},
    sqa::{context::SqaContext, state::MixingLayout},
};

/// Oscillation right-hand side for one spatial step.
///
/// Holds the fixed inputs of the step: the adiabatic bases, the baseline
/// density matrices rotated into those bases, and the matter potential. The
/// state vector handed to [`ODE::ode`] is the flat mixing-angle vector
/// described by [`MixingLayout`].
pub struct Oscillation<'a> {
    pub context: &'a SqaContext,
    pub grid: &'a EnergyGrid,
    pub layout: MixingLayout,
    /// Baseline density matrices in the adiabatic basis, `U0† f0 U0`.
    pub p0: &'a [Vec<Matrix2>; NM],
    /// Diagonal matter potential `[Ve, Vμ]` [erg].
    pub potential: [Float; NF],
}

impl Oscillation<'_> {
    /// Flavour-basis self-interaction potential at the stage state, and the
    /// matter-branch S-matrix of every bin.
    fn self_interaction(&self, y: &[Float]) -> (Matrix2, [Vec<Matrix2>; NM]) {
        let ne = self.layout.ne();
        let mut s_msw: [Vec<Matrix2>; NM] = [Vec::with_capacity(ne), Vec::with_capacity(ne)];
        let mut polarisation = Matrix2::zeros();

        for species in Species::ALL {
            for i in 0..ne {
                let msw = self.layout.angles(y, species, i, Branch::Msw).s_matrix();
                let si = self.layout.angles(y, species, i, Branch::Si).s_matrix();
                let p = (msw * si).conjugate(&self.p0[species.index()][i]);
                let f = self.context.bin(species, i).u0().conjugate(&p);
                let weight = self.grid.phase_space(i);
                polarisation += match species {
                    Species::Matter => f.scale(weight),
                    Species::Antimatter => -f.conj().scale(weight),
                };
                s_msw[species.index()].push(msw);
            }
        }

        (polarisation.scale(SQRT2_GF), s_msw)
    }
}

impl ODE for Oscillation<'_> {
    fn ode(&self, _r: Float, y: &[Float], dydr: &mut [Float]) {
        // every bin's SI branch needs the potential of all bins first
        let (vsi, s_msw) = self.self_interaction(y);
        let v = Matrix2::real_diag(self.potential[0], self.potential[1]);

        for species in Species::ALL {
            let v_si = match species {
                Species::Matter => vsi,
                Species::Antimatter => -vsi.conj(),
            };
            for i in 0..self.layout.ne() {
                let u0 = self.context.bin(species, i).u0();
                let hfv = *self.context.vacuum.hfv(species, i);
                let hf = match species {
                    Species::Matter => hfv + v,
                    Species::Antimatter => hfv - v,
                };

                let h_msw = u0.adjoint() * hf * *u0;
                let o = self.layout.offset(species, i, Branch::Msw);
                let angles = self.layout.angles(y, species, i, Branch::Msw);
                branch_derivative(&angles, &h_msw, &mut dydr[o..]);

                let s = s_msw[species.index()][i];
                let h_si = s.adjoint() * u0.adjoint() * v_si * *u0 * s;
                let o = self.layout.offset(species, i, Branch::Si);
                let angles = self.layout.angles(y, species, i, Branch::Si);
                branch_derivative(&angles, &h_si, &mut dydr[o..]);
            }
        }
    }
}

/// Derivative of one branch's angles under the Hamiltonian `h` [erg] expressed
/// in the frame the branch S-matrix acts in.
///
/// The diagonal of `h` drives the phase counters of `W`; the off-diagonal
/// coupling, taken into the interaction picture of `W`, rotates `B`.
pub fn branch_derivative(y: &MixingAngles, h: &Matrix2, out: &mut [Float]) {
    let a = &y.0;
    out[4] = h[(0, 0)].re / (TAU * HBARC);
    out[5] = h[(1, 1)].re / (TAU * HBARC);

    let coupling = h[(0, 1)] * C64::from_polar(1.0, TAU * (a[4] - a[5]));
    let (alpha, beta) = y.alpha_beta();
    let i_det = C64::new(0.0, a[3] / HBARC);
    let dalpha = i_det * coupling * beta.conj();
    let dbeta = -i_det * coupling * alpha.conj();
    let dq = [dbeta.re, dbeta.im, dalpha.re, dalpha.im];

    let j = y.jinverse();
    for row in 0..3 {
        out[row] = (0..4).map(|n| j[row][n] * dq[n]).sum();
    }
    out[3] = 0.0;
}
