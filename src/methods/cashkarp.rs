//! Single trial step of an embedded explicit Runge-Kutta pair.
//!
//! The stepper only forms the stages, the propagated solution and the error
//! estimate. Accepting, rejecting and resizing steps is left to the caller,
//! which also has to fold the collision error into the same decision.

use crate::{
    Float,
    core::ode::ODE,
    error::Error,
    methods::tableau::{ButcherTableau, CASH_KARP},
};

/// Stage storage and coefficients for an `S`-stage embedded pair.
pub struct EmbeddedStepper<const S: usize> {
    tableau: ButcherTableau<S>,
    ks: Vec<Vec<Float>>,
    yt: Vec<Float>,
}

/// Cash-Karp 5(4) stepper.
pub type CashKarp = EmbeddedStepper<6>;

impl CashKarp {
    pub fn cash_karp(n: usize) -> Self {
        Self::new(CASH_KARP, n)
    }
}

impl<const S: usize> EmbeddedStepper<S> {
    pub fn new(tableau: ButcherTableau<S>, n: usize) -> Self {
        Self {
            tableau,
            ks: vec![vec![0.0; n]; S],
            yt: vec![0.0; n],
        }
    }

    pub fn tableau(&self) -> &ButcherTableau<S> {
        &self.tableau
    }

    /// Advance `y0` by `dr` from `r0` into `y`.
    ///
    /// Returns the largest absolute component of the embedded error estimate
    /// `dr Σ (b − b̂) K`. Any non-finite stage derivative or solution
    /// component aborts with [`Error::NonFinite`].
    pub fn step<F>(
        &mut self,
        f: &F,
        r0: Float,
        dr: Float,
        y0: &[Float],
        y: &mut [Float],
    ) -> Result<Float, Error>
    where
        F: ODE,
    {
        let n = y0.len();
        let t = self.tableau;

        // Stages
        for k in 0..S {
            self.yt.copy_from_slice(y0);
            for l in 0..k {
                let a = t.a[k][l];
                if a == 0.0 {
                    continue;
                }
                for i in 0..n {
                    self.yt[i] += dr * a * self.ks[l][i];
                }
            }
            let r = r0 + t.c[k] * dr;
            f.ode(r, &self.yt, &mut self.ks[k]);
            if self.ks[k].iter().any(|v| !v.is_finite()) {
                return Err(Error::NonFinite { r });
            }
        }

        // Propagated solution and error estimate
        let mut maxerror: Float = 0.0;
        for i in 0..n {
            let mut incr = 0.0;
            let mut err = 0.0;
            for k in 0..S {
                incr += t.b[k] * self.ks[k][i];
                err += (t.b[k] - t.b_hat[k]) * self.ks[k][i];
            }
            y[i] = y0[i] + dr * incr;
            if !y[i].is_finite() {
                return Err(Error::NonFinite { r: r0 + dr });
            }
            maxerror = maxerror.max((dr * err).abs());
        }

        Ok(maxerror)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay;

    impl ODE for Decay {
        fn ode(&self, _r: Float, y: &[Float], dydr: &mut [Float]) {
            dydr[0] = -y[0];
            dydr[1] = y[0];
        }
    }

    struct Blowup;

    impl ODE for Blowup {
        fn ode(&self, r: Float, _y: &[Float], dydr: &mut [Float]) {
            dydr[0] = 1.0 / (r - 0.5);
        }
    }

    #[test]
    fn exponential_decay_to_fifth_order() {
        let mut stepper = CashKarp::cash_karp(2);
        let y0 = [1.0, 0.0];
        let mut y = [0.0; 2];
        let err = stepper.step(&Decay, 0.0, 0.1, &y0, &mut y).unwrap();
        let exact = (-0.1 as Float).exp();
        assert!((y[0] - exact).abs() < 1e-9);
        assert!((y[0] + y[1] - 1.0).abs() < 1e-15);
        assert!(err > 0.0 && err < 1e-6);
    }

    #[test]
    fn error_estimate_shrinks_with_step() {
        let mut stepper = CashKarp::cash_karp(2);
        let y0 = [1.0, 0.0];
        let mut y = [0.0; 2];
        let e1 = stepper.step(&Decay, 0.0, 0.2, &y0, &mut y).unwrap();
        let e2 = stepper.step(&Decay, 0.0, 0.1, &y0, &mut y).unwrap();
        // local error of the embedded 4th order solution scales like dr⁵
        assert!(e1 / e2 > 16.0);
    }

    #[test]
    fn non_finite_stage_is_fatal() {
        let mut stepper = CashKarp::cash_karp(1);
        let mut y = [0.0];
        // first stage sits on the pole
        let result = stepper.step(&Blowup, 0.5, 0.1, &[0.0], &mut y);
        assert!(matches!(result, Err(Error::NonFinite { .. })));
    }
}
