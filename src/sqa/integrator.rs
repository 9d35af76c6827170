//! Integration loop: adaptive stepping of oscillations and collisions.

use tracing::{info, trace, warn};

use crate::{
    Float,
    core::{
        matrix::Matrix2,
        species::{NF, NM, Species},
        status::Status,
    },
    error::Error,
    methods::{
        cashkarp::CashKarp,
        result::{Evals, Steps},
        settings::Settings,
    },
    physics::{
        grid::EnergyGrid,
        medium::{Fluid, Medium},
        vacuum::VacuumTables,
    },
    sqa::{
        Problem,
        context::SqaContext,
        derivative::Oscillation,
        interact::predictor_corrector,
        reset::ResetPolicy,
        solout::{ControlFlag, SolOut},
        state::{FlavorField, MixingLayout},
    },
};

/// Result of a successful [`Integrator::attempt`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Size of the accepted step [cm].
    pub dr: Float,
    /// Combined oscillation and collision error of the accepted step.
    pub error: Float,
    /// Trial steps rejected before acceptance.
    pub rejections: usize,
    /// The step lands on the target distance.
    pub last: bool,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct Evolution {
    /// Final distance [cm].
    pub r: Float,
    /// Step size proposed for the next step [cm].
    pub dr: Float,
    /// Flavour density matrices at `r`.
    pub f: FlavorField,
    pub evals: Evals,
    pub steps: Steps,
    pub status: Status,
}

/// Stepwise driver owning the evolving state.
///
/// Use [`evolve`] for a complete run. Driving an `Integrator` by hand gives
/// access to the state between steps.
pub struct Integrator<'a, M: Medium + ?Sized> {
    medium: &'a M,
    grid: EnergyGrid,
    fluid: Fluid,
    settings: Settings,
    potential: [Float; NF],
    context: SqaContext,
    layout: MixingLayout,
    stepper: CashKarp,
    policy: ResetPolicy,
    r: Float,
    dr: Float,
    f0: FlavorField,
    f: FlavorField,
    /// Baseline in the adiabatic basis, `U0† f0 U0`.
    p0: [Vec<Matrix2>; NM],
    y: Vec<Float>,
    y_trial: Vec<Float>,
    f_trial: FlavorField,
    interact_error: Float,
    interact_trial: Float,
    densities0: (Float, Float),
    next_progress: Float,
    pub evals: Evals,
    pub steps: Steps,
}

impl<'a, M: Medium + ?Sized> Integrator<'a, M> {
    /// Validate the configuration and build the vacuum tables and the
    /// adiabatic bases at `r = 0`.
    pub fn new(medium: &'a M, problem: &Problem, f0: FlavorField, settings: Settings) -> Result<Self, Error> {
        settings.validate()?;
        problem.fluid.validate()?;
        if f0.len() != problem.grid.len() {
            return Err(Error::InvalidGrid(format!(
                "initial state has {} bins but the grid has {}",
                f0.len(),
                problem.grid.len()
            )));
        }

        let vacuum = VacuumTables::new(&problem.vacuum, &problem.grid)?;
        let potential = medium.matter_potential(&problem.fluid);
        let context = SqaContext::new(vacuum, potential);
        let ne = problem.grid.len();
        let layout = MixingLayout::new(ne);
        let y = layout.identity();

        let mut integrator = Self {
            medium,
            grid: problem.grid.clone(),
            fluid: problem.fluid,
            potential,
            context,
            layout,
            stepper: CashKarp::cash_karp(layout.len()),
            policy: ResetPolicy::new(&settings),
            r: 0.0,
            dr: settings.dr0,
            densities0: f0.number_densities(&problem.grid),
            next_progress: 0.0,
            f: f0.clone(),
            f_trial: f0.clone(),
            f0,
            p0: [Vec::new(), Vec::new()],
            y_trial: y.clone(),
            y,
            interact_error: 0.0,
            interact_trial: 0.0,
            evals: Evals::new(),
            steps: Steps::new(),
            settings,
        };
        integrator.refresh_baseline();
        // reference line for the number density ratios
        integrator.progress();
        Ok(integrator)
    }

    pub fn r(&self) -> Float {
        self.r
    }

    pub fn dr(&self) -> Float {
        self.dr
    }

    /// Current flavour density matrices.
    pub fn f(&self) -> &FlavorField {
        &self.f
    }

    /// Baseline density matrices at the last reset of each bin.
    pub fn f0(&self) -> &FlavorField {
        &self.f0
    }

    /// Flat mixing-angle state.
    pub fn y(&self) -> &[Float] {
        &self.y
    }

    pub fn layout(&self) -> &MixingLayout {
        &self.layout
    }

    pub fn context(&self) -> &SqaContext {
        &self.context
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Collision error of the last accepted step.
    pub fn interact_error(&self) -> Float {
        self.interact_error
    }

    pub fn finished(&self) -> bool {
        self.r >= self.settings.rmax
    }

    fn refresh_baseline(&mut self) {
        for species in Species::ALL {
            self.p0[species.index()] = (0..self.layout.ne())
                .map(|i| {
                    let u0 = self.context.bin(species, i).u0();
                    u0.adjoint().conjugate(self.f0.get(species, i))
                })
                .collect();
        }
    }

    /// Rebuild `f_trial` from the baseline at the trial angles and apply
    /// collisions. Returns the combined error estimate.
    fn trial(&mut self, dr: Float) -> Result<Float, Error> {
        let mut error: Float = 0.0;

        if self.settings.oscillate {
            let oscillation = Oscillation {
                context: &self.context,
                grid: &self.grid,
                layout: self.layout,
                p0: &self.p0,
                potential: self.potential,
            };
            error = self.stepper.step(&oscillation, self.r, dr, &self.y, &mut self.y_trial)?;
            self.evals.derivative += self.stepper.tableau().stages();

            for species in Species::ALL {
                for i in 0..self.layout.ne() {
                    let s = self.layout.s_matrix(&self.y_trial, species, i);
                    let p = s.conjugate(&self.p0[species.index()][i]);
                    *self.f_trial.get_mut(species, i) = self.context.bin(species, i).u0().conjugate(&p);
                }
            }
        } else {
            self.y_trial.copy_from_slice(&self.y);
            self.f_trial.clone_from(&self.f0);
        }

        self.interact_trial = 0.0;
        if self.settings.interact {
            let r_end = self.r + dr;
            let context = &self.context;
            self.interact_trial = predictor_corrector(
                self.medium,
                &self.fluid,
                &self.grid,
                &mut self.f_trial,
                |species, i| r_end - context.bin(species, i).last_reset,
            );
            self.evals.interaction += 2;
            error = error.max(self.interact_trial);
        }

        if !self.f_trial.is_finite() {
            return Err(Error::NonFinite { r: self.r + dr });
        }
        Ok(error)
    }

    /// Try steps from the current distance, shrinking the step size after
    /// every rejection, until one meets the accuracy.
    ///
    /// Gives up with [`Error::StepSizeTooSmall`] after `max_rejections`
    /// rejections or when the step can no longer shrink.
    pub fn attempt(&mut self) -> Result<StepOutcome, Error> {
        let accuracy = self.settings.accuracy;
        let remaining = self.settings.rmax - self.r;
        let floor = 4.0 * self.r.abs() * Float::EPSILON;
        let mut dr = self.dr.min(remaining);
        let mut rejections = 0;

        loop {
            let error = self.trial(dr)?;
            self.steps.total += 1;
            if error <= accuracy {
                return Ok(StepOutcome {
                    dr,
                    error,
                    rejections,
                    last: dr >= remaining,
                });
            }

            rejections += 1;
            self.steps.rejected += 1;
            trace!(r = self.r, dr, error, "step rejected");
            if rejections >= self.settings.max_rejections {
                return Err(Error::StepSizeTooSmall { r: self.r, dr });
            }

            let shrink = (accuracy / error).powf(self.stepper.tableau().reject_exponent());
            let mut shrunk = dr * self.settings.safety_factor * shrink;
            if shrunk < floor {
                warn!(r = self.r, dr = shrunk, floor, "step size clamped to floor");
                shrunk = floor;
            }
            if !(shrunk < dr) {
                return Err(Error::StepSizeTooSmall { r: self.r, dr });
            }
            dr = shrunk;
        }
    }

    /// Take one accepted step, apply the reset policy and predict the next
    /// step size.
    pub fn step(&mut self) -> Result<StepOutcome, Error> {
        let outcome = self.attempt()?;

        self.r = if outcome.last {
            self.settings.rmax
        } else {
            self.r + outcome.dr
        };
        std::mem::swap(&mut self.y, &mut self.y_trial);
        std::mem::swap(&mut self.f, &mut self.f_trial);
        self.interact_error = self.interact_trial;
        self.steps.accepted += 1;

        if self.interact_error > self.settings.accuracy {
            return Err(Error::InteractionOverrun {
                r: self.r,
                error: self.interact_error,
                accuracy: self.settings.accuracy,
            });
        }

        let resets = self.policy.apply(
            &mut self.context,
            &self.layout,
            &mut self.y,
            &mut self.f0,
            &self.f,
            self.potential,
            self.r,
            self.interact_error,
        );
        if resets > 0 {
            self.steps.resets += resets;
            self.refresh_baseline();
        }

        let increase = self.settings.increase;
        let mut dr = outcome.dr * increase;
        if outcome.error > 0.0 {
            let grow = (self.settings.accuracy / outcome.error).powf(self.stepper.tableau().accept_exponent());
            dr *= (grow / increase).min(1.0);
        }
        self.dr = dr.max(4.0 * self.r * Float::EPSILON);

        self.progress();
        Ok(outcome)
    }

    fn progress(&mut self) {
        if self.r < self.next_progress {
            return;
        }
        while self.next_progress <= self.r {
            self.next_progress += self.settings.progress_interval;
        }

        let (n0, nbar0) = self.densities0;
        let (n, nbar) = self.f.number_densities(&self.grid);
        info!(
            r = self.r,
            dr = self.dr,
            steps = self.steps.accepted,
            n_ratio = n / n0,
            nbar_ratio = nbar / nbar0,
            lepton_ratio = (n - nbar) / (n0 - nbar0),
            "progress"
        );
    }

    pub fn into_evolution(self, status: Status) -> Evolution {
        Evolution {
            r: self.r,
            dr: self.dr,
            f: self.f,
            evals: self.evals,
            steps: self.steps,
            status,
        }
    }
}

/// Evolve `f0` from `r = 0` to `settings.rmax` through `medium`.
///
/// `solout` sees the initial state, every `output_stride`-th accepted step
/// and the final step. Configuration errors surface before the first step;
/// numerical failures abort the run.
pub fn evolve<M, S>(
    medium: &M,
    problem: &Problem,
    f0: FlavorField,
    solout: &mut S,
    settings: Settings,
) -> Result<Evolution, Error>
where
    M: Medium + ?Sized,
    S: SolOut,
{
    let mut integrator = Integrator::new(medium, problem, f0, settings)?;
    let stride = integrator.settings.output_stride;
    let nmax = integrator.settings.nmax;

    let mut r_old = integrator.r();
    if let ControlFlag::Interrupt = solout.solout(r_old, r_old, integrator.dr(), integrator.f()) {
        return Ok(integrator.into_evolution(Status::Interrupted));
    }

    let mut status = Status::Success;
    while !integrator.finished() {
        if integrator.steps.accepted >= nmax {
            warn!(r = integrator.r(), nmax, "step limit reached");
            status = Status::NeedLargerNMax;
            break;
        }

        let outcome = integrator.step()?;
        if outcome.last || integrator.steps.accepted % stride == 0 {
            let r = integrator.r();
            if let ControlFlag::Interrupt = solout.solout(r_old, r, integrator.dr(), integrator.f()) {
                status = Status::Interrupted;
                break;
            }
            r_old = r;
        }
    }

    Ok(integrator.into_evolution(status))
}
