//! Reset policy: fold accumulated evolution into the baseline.

use tracing::debug;

use crate::{
    Float,
    core::species::{Branch, NF, Species},
    methods::settings::{ResetMode, Settings},
    physics::basis::MixingAngles,
    sqa::{
        context::SqaContext,
        state::{FlavorField, MixingLayout},
    },
};

/// Margin by which the off-diagonal weight of an S-matrix must exceed the
/// diagonal weight before a selective reset is triggered.
const ROTATION_MARGIN: Float = 0.1;

/// Fraction of the accuracy at which the collision error forces a reset.
const INTERACTION_FRACTION: Float = 0.1;

/// `true` once the branch has rotated further from diagonal than the margin.
pub fn rotated(angles: &MixingAngles) -> bool {
    let s = angles.s_matrix();
    s[(0, 0)].norm_sqr() + ROTATION_MARGIN < s[(0, 1)].norm_sqr()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetPolicy {
    pub mode: ResetMode,
    /// Collision error at or above which every bin is reset.
    pub interaction_threshold: Float,
}

impl ResetPolicy {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: settings.reset,
            interaction_threshold: INTERACTION_FRACTION * settings.accuracy,
        }
    }

    /// Whether bin `(species, i)` must be reset after an accepted step.
    pub fn triggered(
        &self,
        layout: &MixingLayout,
        y: &[Float],
        species: Species,
        i: usize,
        interact_error: Float,
    ) -> bool {
        match self.mode {
            ResetMode::EveryStep => true,
            ResetMode::Selective => {
                interact_error >= self.interaction_threshold
                    || Branch::ALL
                        .iter()
                        .any(|&b| rotated(&layout.angles(y, species, i, b)))
            }
        }
    }

    /// Apply the policy to every bin at distance `r`.
    ///
    /// A reset bin takes `f` as its new baseline, returns its angles to the
    /// identity and gets a fresh adiabatic basis for the potential `v`. Every
    /// other bin only has its phases wrapped. Returns the number of resets.
    #[allow(clippy::too_many_arguments)]
    pub fn apply(
        &self,
        context: &mut SqaContext,
        layout: &MixingLayout,
        y: &mut [Float],
        f0: &mut FlavorField,
        f: &FlavorField,
        v: [Float; NF],
        r: Float,
        interact_error: Float,
    ) -> usize {
        let mut resets = 0;
        for species in Species::ALL {
            for i in 0..layout.ne() {
                if self.triggered(layout, y, species, i, interact_error) {
                    *f0.get_mut(species, i) = *f.get(species, i);
                    for branch in Branch::ALL {
                        layout.set(y, species, i, branch, &MixingAngles::IDENTITY);
                    }
                    context.rebuild(species, i, v, r);
                    resets += 1;
                } else {
                    for branch in Branch::ALL {
                        let mut angles = layout.angles(y, species, i, branch);
                        angles.wrap_phases();
                        layout.set(y, species, i, branch, &angles);
                    }
                }
            }
        }
        if resets > 0 {
            debug!(r, resets, interact_error, "reset");
        }
        resets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{
        grid::EnergyGrid,
        vacuum::{VacuumParameters, VacuumTables},
    };

    fn context() -> (SqaContext, EnergyGrid) {
        let grid = EnergyGrid::uniform(2, 5.0, 25.0).unwrap();
        let params = VacuumParameters::builder().dm21(7.4e-5).theta12(33.8).build();
        let vacuum = VacuumTables::new(&params, &grid).unwrap();
        (SqaContext::new(vacuum, [0.0, 0.0]), grid)
    }

    fn settings(reset: ResetMode) -> Settings {
        Settings::builder().rmax(1.0).accuracy(1e-6).reset(reset).build()
    }

    #[test]
    fn small_rotations_only_wrap_phases() {
        let (mut ctx, grid) = context();
        let layout = MixingLayout::new(grid.len());
        let mut y = layout.identity();
        let mut angles = MixingAngles::IDENTITY;
        angles.0[4] = 2.25;
        angles.0[0] -= 0.05;
        layout.set(&mut y, Species::Matter, 1, Branch::Msw, &angles);

        let mut f0 = FlavorField::zeros(grid.len());
        let f = FlavorField::from_occupations(&grid, 0.0, |_, _, _| 0.5);
        let policy = ResetPolicy::new(&settings(ResetMode::Selective));
        let resets = policy.apply(&mut ctx, &layout, &mut y, &mut f0, &f, [0.0, 0.0], 2.0, 0.0);

        assert_eq!(resets, 0);
        assert_eq!(f0, FlavorField::zeros(grid.len()));
        let wrapped = layout.angles(&y, Species::Matter, 1, Branch::Msw);
        assert!((wrapped.0[4] - 0.25).abs() < 1e-15);
        assert_eq!(wrapped.0[0], angles.0[0]);
        assert_eq!(ctx.bin(Species::Matter, 1).last_reset, 0.0);
    }

    #[test]
    fn large_rotation_resets_only_that_bin() {
        let (mut ctx, grid) = context();
        let layout = MixingLayout::new(grid.len());
        let mut y = layout.identity();
        // ψ1 near 0 puts all weight on the off-diagonal β
        let mut angles = MixingAngles::IDENTITY;
        angles.0[0] = 0.1;
        layout.set(&mut y, Species::Antimatter, 0, Branch::Si, &angles);
        assert!(rotated(&angles));

        let mut f0 = FlavorField::zeros(grid.len());
        let f = FlavorField::from_occupations(&grid, 0.0, |_, _, _| 0.5);
        let policy = ResetPolicy::new(&settings(ResetMode::Selective));
        let resets = policy.apply(&mut ctx, &layout, &mut y, &mut f0, &f, [0.0, 0.0], 3.0, 0.0);

        assert_eq!(resets, 1);
        assert_eq!(f0.get(Species::Antimatter, 0), f.get(Species::Antimatter, 0));
        assert_eq!(*f0.get(Species::Matter, 0), crate::core::matrix::Matrix2::zeros());
        assert_eq!(layout.angles(&y, Species::Antimatter, 0, Branch::Si), MixingAngles::IDENTITY);
        assert_eq!(ctx.bin(Species::Antimatter, 0).last_reset, 3.0);
        assert_eq!(ctx.bin(Species::Matter, 0).last_reset, 0.0);
    }

    #[test]
    fn collision_error_forces_reset() {
        let (mut ctx, grid) = context();
        let layout = MixingLayout::new(grid.len());
        let mut y = layout.identity();
        let mut f0 = FlavorField::zeros(grid.len());
        let f = FlavorField::from_occupations(&grid, 0.0, |_, _, _| 0.5);
        let policy = ResetPolicy::new(&settings(ResetMode::Selective));
        let resets = policy.apply(&mut ctx, &layout, &mut y, &mut f0, &f, [0.0, 0.0], 1.0, 2e-7);
        assert_eq!(resets, 4);
        assert_eq!(f0, f);
    }

    #[test]
    fn every_step_mode_resets_all_bins() {
        let (mut ctx, grid) = context();
        let layout = MixingLayout::new(grid.len());
        let mut y = layout.identity();
        let mut f0 = FlavorField::zeros(grid.len());
        let f = FlavorField::from_occupations(&grid, 0.2, |_, _, _| 0.5);
        let policy = ResetPolicy::new(&settings(ResetMode::EveryStep));
        let resets = policy.apply(&mut ctx, &layout, &mut y, &mut f0, &f, [0.0, 0.0], 1.0, 0.0);
        assert_eq!(resets, 2 * grid.len());
        assert_eq!(y, layout.identity());
    }
}
