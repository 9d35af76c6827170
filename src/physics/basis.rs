//! Mixing-angle parametrisation of the two-flavour S-matrix.
//!
//! An evolution operator is written as `S = W(Y) · B(Y)` where
//!
//! ```text
//! W = diag(exp(-2πi Y4), exp(-2πi Y5))
//! B = [[ α,       β      ],
//!      [ -Y3 β*,  Y3 α*  ]]
//! α = sin ψ1 sin ψ2 exp(iψ3)
//! β = cos ψ1 + i sin ψ1 cos ψ2
//! ```
//!
//! with `(ψ1, ψ2, ψ3) = (Y0, Y1, Y2)`. `(Re β, Im β, Re α, Im α)` is a unit
//! quaternion in hyperspherical coordinates, so `B` is unitary for any angles
//! and `det B = Y3`. The coordinates break down where `sin ψ1 = 0` or
//! `sin ψ1 sin ψ2 = 0`; the identity configuration sits at `ψ1 = ψ2 = π/2`,
//! well away from both.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::{
    Float,
    core::matrix::{C64, Matrix2},
};

/// Number of real components in a mixing-angle state.
pub const NY: usize = 6;

/// Mixing-angle state of one (species, energy bin, branch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixingAngles(pub [Float; NY]);

impl MixingAngles {
    /// Configuration whose S-matrix is the identity.
    pub const IDENTITY: MixingAngles = MixingAngles([FRAC_PI_2, FRAC_PI_2, 0.0, 1.0, 0.0, 0.0]);

    pub fn as_slice(&self) -> &[Float] {
        &self.0
    }

    /// Diagonal phase factor `W`.
    pub fn w(&self) -> Matrix2 {
        let y = &self.0;
        Matrix2::diag(C64::from_polar(1.0, -TAU * y[4]), C64::from_polar(1.0, -TAU * y[5]))
    }

    /// The quaternion elements `(α, β)` of `B`.
    pub fn alpha_beta(&self) -> (C64, C64) {
        let y = &self.0;
        let (s1, c1) = sin_cos(y[0]);
        let (s2, c2) = sin_cos(y[1]);
        let alpha = C64::from_polar(s1 * s2, y[2]);
        let beta = C64::new(c1, s1 * c2);
        (alpha, beta)
    }

    /// Rotation-like factor `B`.
    pub fn b(&self) -> Matrix2 {
        let det = self.0[3];
        let (alpha, beta) = self.alpha_beta();
        Matrix2::new([[alpha, beta], [-beta.conj() * det, alpha.conj() * det]])
    }

    /// Full S-matrix `W · B`.
    pub fn s_matrix(&self) -> Matrix2 {
        self.w() * self.b()
    }

    /// Map a change of the quaternion `(dq0, dq1, dq2, dq3)` onto the change of
    /// `(ψ1, ψ2, ψ3)`.
    pub fn jinverse(&self) -> [[Float; 4]; 3] {
        let y = &self.0;
        let (s1, c1) = sin_cos(y[0]);
        let (s2, c2) = sin_cos(y[1]);
        let (s3, c3) = y[2].sin_cos();
        let s12 = s1 * s2;

        [
            [-s1, c1 * c2, c1 * s2 * c3, c1 * s2 * s3],
            [0.0, -s2 / s1, c2 * c3 / s1, c2 * s3 / s1],
            [0.0, 0.0, -s3 / s12, c3 / s12],
        ]
    }

    /// Bound the phase-type components without changing the S-matrix:
    /// `ψ3` modulo 2π and the turn counters `Y4`, `Y5` to their fractional part.
    pub fn wrap_phases(&mut self) {
        let y = &mut self.0;
        y[2] %= TAU;
        y[4] = y[4].fract();
        y[5] = y[5].fract();
    }
}

/// `(sin ψ, cos ψ)` with the cosine taken as `sin(π/2 − ψ)`, which vanishes
/// exactly at `ψ = π/2` and keeps `S(identity)` bit-exact.
fn sin_cos(psi: Float) -> (Float, Float) {
    (psi.sin(), (FRAC_PI_2 - psi).sin())
}

impl Default for MixingAngles {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unitarity_defect(s: &Matrix2) -> Float {
        (*s * s.adjoint()).max_abs_diff(&Matrix2::identity())
    }

    #[test]
    fn identity_state_gives_identity_matrix() {
        let s = MixingAngles::IDENTITY.s_matrix();
        assert_eq!(s, Matrix2::identity());
        assert_eq!(s.max_abs_diff(&Matrix2::identity()), 0.0);
    }

    #[test]
    fn arbitrary_angles_are_unitary() {
        let y = MixingAngles([0.3, 2.1, -1.4, -1.0, 0.37, 12.9]);
        let s = y.s_matrix();
        assert!(unitarity_defect(&s) < 1e-14);
        assert!((y.b().det() - C64::new(-1.0, 0.0)).norm() < 1e-14);
    }

    #[test]
    fn jinverse_inverts_the_angle_jacobian() {
        // q(ψ) differentiated by finite differences, then mapped back.
        let y = MixingAngles([1.1, 0.7, 0.4, 1.0, 0.0, 0.0]);
        let quat = |m: &MixingAngles| {
            let (a, b) = m.alpha_beta();
            [b.re, b.im, a.re, a.im]
        };
        let j = y.jinverse();
        let eps = 1e-7;
        for k in 0..3 {
            let mut yp = y;
            let mut ym = y;
            yp.0[k] += eps;
            ym.0[k] -= eps;
            let (qp, qm) = (quat(&yp), quat(&ym));
            let dq: Vec<Float> = (0..4).map(|n| (qp[n] - qm[n]) / (2.0 * eps)).collect();
            for row in 0..3 {
                let dpsi: Float = (0..4).map(|n| j[row][n] * dq[n]).sum();
                let expected = if row == k { 1.0 } else { 0.0 };
                assert!((dpsi - expected).abs() < 1e-6, "row {row} col {k}: {dpsi}");
            }
        }
    }

    #[test]
    fn wrapping_phases_keeps_the_s_matrix() {
        let mut y = MixingAngles([1.2, 1.9, 7.5, 1.0, 3.25, -2.75]);
        let before = y.s_matrix();
        y.wrap_phases();
        assert!(y.0[4].abs() < 1.0 && y.0[5].abs() < 1.0);
        assert!(y.0[2].abs() < TAU);
        assert!(before.max_abs_diff(&y.s_matrix()) < 1e-12);
    }
}
