//! Dense 2×2 complex matrices.
//!
//! The flavour machinery only ever needs two-dimensional operators, so the
//! storage is a fixed array and every operation is written out by hand.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub};

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::Float;

pub type C64 = Complex<Float>;

/// Complex 2×2 matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Matrix2 {
    pub data: [[C64; 2]; 2],
}

impl Matrix2 {
    pub const fn new(data: [[C64; 2]; 2]) -> Self {
        Self { data }
    }

    pub fn zeros() -> Self {
        Self::default()
    }

    pub fn identity() -> Self {
        Self::diag(C64::new(1.0, 0.0), C64::new(1.0, 0.0))
    }

    pub fn diag(a: C64, b: C64) -> Self {
        let zero = C64::new(0.0, 0.0);
        Self::new([[a, zero], [zero, b]])
    }

    /// Real diagonal matrix.
    pub fn real_diag(a: Float, b: Float) -> Self {
        Self::diag(C64::new(a, 0.0), C64::new(b, 0.0))
    }

    /// Hermitian matrix from its real diagonal and upper off-diagonal element.
    pub fn hermitian(d0: Float, d1: Float, off: C64) -> Self {
        Self::new([[C64::new(d0, 0.0), off], [off.conj(), C64::new(d1, 0.0)]])
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let d = &self.data;
        Self::new([[d[0][0].conj(), d[1][0].conj()], [d[0][1].conj(), d[1][1].conj()]])
    }

    /// Element-wise complex conjugate.
    pub fn conj(&self) -> Self {
        let d = &self.data;
        Self::new([[d[0][0].conj(), d[0][1].conj()], [d[1][0].conj(), d[1][1].conj()]])
    }

    pub fn trace(&self) -> C64 {
        self.data[0][0] + self.data[1][1]
    }

    pub fn det(&self) -> C64 {
        let d = &self.data;
        d[0][0] * d[1][1] - d[0][1] * d[1][0]
    }

    /// Matrix of cofactors (not transposed).
    pub fn cofactors(&self) -> Self {
        let d = &self.data;
        Self::new([[d[1][1], -d[1][0]], [-d[0][1], d[0][0]]])
    }

    pub fn scale(&self, s: Float) -> Self {
        let d = &self.data;
        Self::new([[d[0][0] * s, d[0][1] * s], [d[1][0] * s, d[1][1] * s]])
    }

    /// `{self, other} = self·other + other·self`
    pub fn anticommutator(&self, other: &Self) -> Self {
        *self * *other + *other * *self
    }

    /// `self · m · self†`
    pub fn conjugate(&self, m: &Self) -> Self {
        *self * *m * self.adjoint()
    }

    /// Largest element-wise modulus of `self − other`.
    pub fn max_abs_diff(&self, other: &Self) -> Float {
        let mut max: Float = 0.0;
        for i in 0..2 {
            for j in 0..2 {
                max = max.max((self.data[i][j] - other.data[i][j]).norm());
            }
        }
        max
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|z| z.re.is_finite() && z.im.is_finite())
    }
}

impl Index<(usize, usize)> for Matrix2 {
    type Output = C64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i][j]
    }
}

impl IndexMut<(usize, usize)> for Matrix2 {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        &mut self.data[i][j]
    }
}

impl Add for Matrix2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (a, b) = (&self.data, &rhs.data);
        Self::new([
            [a[0][0] + b[0][0], a[0][1] + b[0][1]],
            [a[1][0] + b[1][0], a[1][1] + b[1][1]],
        ])
    }
}

impl AddAssign for Matrix2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Matrix2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Neg for Matrix2 {
    type Output = Self;

    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

impl Mul for Matrix2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (&self.data, &rhs.data);
        Self::new([
            [
                a[0][0] * b[0][0] + a[0][1] * b[1][0],
                a[0][0] * b[0][1] + a[0][1] * b[1][1],
            ],
            [
                a[1][0] * b[0][0] + a[1][1] * b[1][0],
                a[1][0] * b[0][1] + a[1][1] * b[1][1],
            ],
        ])
    }
}

impl Mul<Float> for Matrix2 {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix2 {
        Matrix2::new([
            [C64::new(1.0, 2.0), C64::new(-0.5, 0.25)],
            [C64::new(3.0, -1.0), C64::new(0.0, 4.0)],
        ])
    }

    #[test]
    fn identity_is_neutral() {
        let a = sample();
        assert_eq!(a * Matrix2::identity(), a);
        assert_eq!(Matrix2::identity() * a, a);
    }

    #[test]
    fn adjoint_reverses_products() {
        let a = sample();
        let b = Matrix2::hermitian(2.0, -1.0, C64::new(0.3, 0.7));
        let lhs = (a * b).adjoint();
        let rhs = b.adjoint() * a.adjoint();
        assert!(lhs.max_abs_diff(&rhs) < 1e-14);
    }

    #[test]
    fn cofactors_give_inverse() {
        // A⁻¹ = cof(A)ᵀ / det(A)
        let a = sample();
        let cof = a.cofactors();
        let adj = Matrix2::new([[cof[(0, 0)], cof[(1, 0)]], [cof[(0, 1)], cof[(1, 1)]]]);
        let det = a.det();
        let prod = a * adj;
        assert!((prod[(0, 0)] - det).norm() < 1e-12);
        assert!((prod[(1, 1)] - det).norm() < 1e-12);
        assert!(prod[(0, 1)].norm() < 1e-12);
        assert!(prod[(1, 0)].norm() < 1e-12);
    }
}
