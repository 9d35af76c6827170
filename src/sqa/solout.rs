//! Output hooks: the [`SolOut`] callback trait and a recording implementation
//! that keeps snapshots of the density matrices, optionally wrapping a user
//! SolOut.

use crate::{Float, sqa::state::FlavorField};

/// Return flags for [`SolOut`].
///
/// - `Continue`: proceed with integration as normal.
/// - `Interrupt`: stop integration and return control to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlag {
    Continue,
    Interrupt,
}

/// Callback hook executed at output points.
///
/// The integrator calls `solout` once before the first step (with
/// `r_old == r`), then after every `output_stride` accepted steps, and after
/// the step that reaches the target distance. The arguments are:
/// - `r_old`: the distance at the previous output point,
/// - `r`: the current distance,
/// - `dr`: the step size proposed for the next step,
/// - `f`: the flavour-basis density matrices at `r`.
///
/// Output is write-only: nothing a callback does feeds back into the
/// evolution, apart from stopping it with `ControlFlag::Interrupt`.
///
/// # Example
///
/// ```ignore
/// struct Printer;
/// impl SolOut for Printer {
///     fn solout(&mut self, _r_old: f64, r: f64, _dr: f64, f: &FlavorField) -> ControlFlag {
///         let fee = f.get(Species::Matter, 0)[(0, 0)].re;
///         println!("r = {r:e}, f_ee = {fee}");
///         ControlFlag::Continue
///     }
/// }
/// ```
pub trait SolOut {
    fn solout(&mut self, r_old: Float, r: Float, dr: Float, f: &FlavorField) -> ControlFlag;
}

/// Sink that ignores every output point.
pub struct NoOutput;

impl SolOut for NoOutput {
    fn solout(&mut self, _r_old: Float, _r: Float, _dr: Float, _f: &FlavorField) -> ControlFlag {
        ControlFlag::Continue
    }
}

pub struct StrideRecorder<'a, S: SolOut> {
    r: Vec<Float>,
    f: Vec<FlavorField>,
    user: Option<&'a mut S>,
}

impl<'a, S: SolOut> StrideRecorder<'a, S> {
    pub fn new(user: Option<&'a mut S>) -> Self {
        Self {
            r: Vec::new(),
            f: Vec::new(),
            user,
        }
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Recorded distances and the density matrices at each of them.
    pub fn into_data(self) -> (Vec<Float>, Vec<FlavorField>) {
        (self.r, self.f)
    }
}

impl<S: SolOut> SolOut for StrideRecorder<'_, S> {
    fn solout(&mut self, r_old: Float, r: Float, dr: Float, f: &FlavorField) -> ControlFlag {
        self.r.push(r);
        self.f.push(f.clone());

        if let Some(user) = self.user.as_deref_mut() {
            return user.solout(r_old, r, dr, f);
        }

        ControlFlag::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::grid::EnergyGrid;

    struct StopAt(Float);

    impl SolOut for StopAt {
        fn solout(&mut self, _r_old: Float, r: Float, _dr: Float, _f: &FlavorField) -> ControlFlag {
            if r >= self.0 {
                ControlFlag::Interrupt
            } else {
                ControlFlag::Continue
            }
        }
    }

    #[test]
    fn recorder_forwards_to_the_wrapped_callback() {
        let grid = EnergyGrid::uniform(1, 5.0, 15.0).unwrap();
        let f = FlavorField::from_occupations(&grid, 0.0, |_, _, _| 0.5);
        let mut stop = StopAt(2.0);
        let mut recorder = StrideRecorder::new(Some(&mut stop));
        assert!(recorder.is_empty());
        assert_eq!(recorder.solout(0.0, 1.0, 0.1, &f), ControlFlag::Continue);
        assert_eq!(recorder.solout(1.0, 2.0, 0.1, &f), ControlFlag::Interrupt);

        let (r, snapshots) = recorder.into_data();
        assert_eq!(r, vec![1.0, 2.0]);
        assert_eq!(snapshots, vec![f.clone(), f]);
    }
}
