//! Settings for the flavour integrator

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{Float, error::Error};

/// When the Reset Policy folds the accumulated evolution into the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResetMode {
    /// Reset every bin after every accepted step.
    #[default]
    EveryStep,
    /// Reset a bin only when one of its S-matrices has rotated far from
    /// diagonal or the collision error approaches the tolerance.
    Selective,
}

#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Settings for the flavour integrator
pub struct Settings {
    /// Target distance [cm].
    pub rmax: Float,
    /// Initial step size [cm].
    #[builder(default = 1.0e-3)]
    #[serde(default = "defaults::dr0")]
    pub dr0: Float,
    /// Largest accepted error in the mixing angles and in the relative
    /// collision increment.
    #[builder(default = 1.0e-8)]
    #[serde(default = "defaults::accuracy")]
    pub accuracy: Float,
    /// Growth factor of the step size after an accepted step.
    #[builder(default = 3.0)]
    #[serde(default = "defaults::increase")]
    pub increase: Float,
    /// Safety factor in step-size prediction after a rejection.
    #[builder(default = 0.9)]
    #[serde(default = "defaults::safety_factor")]
    pub safety_factor: Float,
    /// Maximum number of accepted steps.
    #[builder(default = 10_000_000)]
    #[serde(default = "defaults::nmax")]
    pub nmax: usize,
    /// Maximum number of consecutive rejections of a single step.
    #[builder(default = 1_000)]
    #[serde(default = "defaults::max_rejections")]
    pub max_rejections: usize,
    /// Accepted steps between calls to the output hook.
    #[builder(default = 1)]
    #[serde(default = "defaults::output_stride")]
    pub output_stride: usize,
    /// Distance between progress log lines [cm].
    #[builder(default = 1.0e5)]
    #[serde(default = "defaults::progress_interval")]
    pub progress_interval: Float,
    /// Evolve flavour coherently.
    #[builder(default = true)]
    #[serde(default = "defaults::enabled")]
    pub oscillate: bool,
    /// Apply emission and absorption.
    #[builder(default = false)]
    #[serde(default)]
    pub interact: bool,
    /// Reset policy.
    #[builder(default)]
    #[serde(default)]
    pub reset: ResetMode,
}

impl Settings {
    /// Collect every inconsistency instead of stopping at the first.
    pub fn validate(&self) -> Result<(), Error> {
        let mut problems: Vec<String> = Vec::new();

        if !(self.rmax > 0.0 && self.rmax.is_finite()) {
            problems.push(format!("rmax must be positive (got {})", self.rmax));
        }
        if !(self.dr0 > 0.0 && self.dr0.is_finite()) {
            problems.push(format!("dr0 must be positive (got {})", self.dr0));
        }
        if !(self.accuracy > 0.0 && self.accuracy < 1.0) {
            problems.push(format!("accuracy must be in (0, 1) (got {})", self.accuracy));
        }
        if !(self.increase >= 1.0 && self.increase.is_finite()) {
            problems.push(format!("increase must be at least 1 (got {})", self.increase));
        }
        if self.safety_factor >= 1.0 || self.safety_factor <= 1e-4 {
            problems.push(format!(
                "safety_factor must be in (1e-4, 1.0) (got {})",
                self.safety_factor
            ));
        }
        if self.nmax == 0 {
            problems.push("nmax must be positive".into());
        }
        if self.max_rejections == 0 {
            problems.push("max_rejections must be positive".into());
        }
        if self.output_stride == 0 {
            problems.push("output_stride must be positive".into());
        }
        if !(self.progress_interval > 0.0) {
            problems.push(format!(
                "progress_interval must be positive (got {})",
                self.progress_interval
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidSettings(problems.join("; ")))
        }
    }
}

mod defaults {
    use crate::Float;

    pub fn dr0() -> Float {
        1.0e-3
    }
    pub fn accuracy() -> Float {
        1.0e-8
    }
    pub fn increase() -> Float {
        3.0
    }
    pub fn safety_factor() -> Float {
        0.9
    }
    pub fn nmax() -> usize {
        10_000_000
    }
    pub fn max_rejections() -> usize {
        1_000
    }
    pub fn output_stride() -> usize {
        1
    }
    pub fn progress_interval() -> Float {
        1.0e5
    }
    pub fn enabled() -> bool {
        true
    }
}
