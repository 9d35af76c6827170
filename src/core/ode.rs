//! Right-hand side of the mixing-angle system.

use crate::Float;

/// Right-hand side `dy/dr = f(r, y)` of a first order system.
///
/// The Runge-Kutta driver calls `ode` once per stage with the stage abscissa
/// `r` and stage state `y` and expects `dydr` to be filled with the
/// derivative. Implementations must not mutate shared state; a stage may be
/// evaluated many times while a step is retried.
///
/// # Example
///
/// ```ignore
/// struct Decay { rate: f64 }
/// impl ODE for Decay {
///     fn ode(&self, _r: f64, y: &[f64], dydr: &mut [f64]) {
///         for (d, v) in dydr.iter_mut().zip(y) {
///             *d = -self.rate * v;
///         }
///     }
/// }
/// ```
pub trait ODE {
    fn ode(&self, r: Float, y: &[Float], dydr: &mut [Float]);
}
