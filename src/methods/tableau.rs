//! Butcher tableaux for embedded explicit Runge-Kutta pairs.

use crate::Float;

/// Coefficients of an embedded explicit Runge-Kutta pair with `S` stages.
///
/// `b` are the weights of the propagated solution of order `order`,
/// `b_hat` those of the embedded solution one order lower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButcherTableau<const S: usize> {
    pub c: [Float; S],
    pub a: [[Float; S]; S],
    pub b: [Float; S],
    pub b_hat: [Float; S],
    pub order: usize,
}

impl<const S: usize> ButcherTableau<S> {
    pub const fn stages(&self) -> usize {
        S
    }

    /// Exponent of the shrink factor applied after a rejected step,
    /// `1/(order - 1)`.
    pub fn reject_exponent(&self) -> Float {
        1.0 / (self.order - 1) as Float
    }

    /// Exponent of the growth factor applied after an accepted step,
    /// `1/order`.
    pub fn accept_exponent(&self) -> Float {
        1.0 / self.order as Float
    }
}

/// Cash-Karp 5(4) pair.
pub const CASH_KARP: ButcherTableau<6> = ButcherTableau {
    c: [0.0, 1.0 / 5.0, 3.0 / 10.0, 3.0 / 5.0, 1.0, 7.0 / 8.0],
    a: [
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0, 0.0, 0.0, 0.0],
        [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0, 0.0, 0.0],
        [
            1631.0 / 55296.0,
            175.0 / 512.0,
            575.0 / 13824.0,
            44275.0 / 110592.0,
            253.0 / 4096.0,
            0.0,
        ],
    ],
    b: [37.0 / 378.0, 0.0, 250.0 / 621.0, 125.0 / 594.0, 0.0, 512.0 / 1771.0],
    b_hat: [
        2825.0 / 27648.0,
        0.0,
        18575.0 / 48384.0,
        13525.0 / 55296.0,
        277.0 / 14336.0,
        1.0 / 4.0,
    ],
    order: 5,
};
