//! Fluid state and the opacity model of the background medium.

use serde::{Deserialize, Serialize};

use crate::{
    Float,
    constants::{M_U, MEV, SQRT2_GF},
    core::species::{Flavor, NF, NM, Species},
    error::Error,
};

/// Thermodynamic state of the matter background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fluid {
    /// Mass density [g/cm³]
    pub density: Float,
    /// Temperature [MeV]
    pub temperature: Float,
    /// Electron fraction Ye
    pub electron_fraction: Float,
}

impl Fluid {
    pub fn new(density: Float, temperature: Float, electron_fraction: Float) -> Self {
        Self {
            density,
            temperature,
            electron_fraction,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.density >= 0.0 && self.density.is_finite()) {
            return Err(Error::InvalidSettings(format!(
                "density must be non-negative (got {})",
                self.density
            )));
        }
        if !(self.temperature > 0.0 && self.temperature.is_finite()) {
            return Err(Error::InvalidSettings(format!(
                "temperature must be positive (got {})",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.electron_fraction) {
            return Err(Error::InvalidSettings(format!(
                "electron fraction must lie in [0, 1] (got {})",
                self.electron_fraction
            )));
        }
        Ok(())
    }

    /// Electron number density [cm⁻³].
    pub fn electron_density(&self) -> Float {
        self.density * self.electron_fraction / M_U
    }
}

/// Matter background seen by the neutrinos.
///
/// Rates are per unit distance [cm⁻¹]. The collision term built from them is
/// `df/dr = E − ½{E + A, f}` with `E = diag(emissivity)` and
/// `A = diag(absorption)`, which relaxes each flavour towards
/// `η / (η + κ)` and damps the coherences at the mean of the two rates.
pub trait Medium {
    /// Diagonal forward-scattering potential `[Ve, Vμ]` [erg].
    fn matter_potential(&self, fluid: &Fluid) -> [Float; NF] {
        [SQRT2_GF * fluid.electron_density(), 0.0]
    }

    /// Emissivity η [cm⁻¹] for `energy` [erg].
    fn emissivity(&self, fluid: &Fluid, species: Species, flavor: Flavor, energy: Float) -> Float;

    /// Absorption opacity κ [cm⁻¹] for `energy` [erg].
    fn absorption(&self, fluid: &Fluid, species: Species, flavor: Flavor, energy: Float) -> Float;

    /// Occupation the collision term relaxes to.
    fn equilibrium(&self, fluid: &Fluid, species: Species, flavor: Flavor, energy: Float) -> Float {
        let eta = self.emissivity(fluid, species, flavor, energy);
        let kappa = self.absorption(fluid, species, flavor, energy);
        if eta + kappa > 0.0 {
            eta / (eta + kappa)
        } else {
            0.0
        }
    }
}

/// Absorption opacities scaling as `E²` with Kirchhoff-law emission towards a
/// Fermi-Dirac distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalMedium {
    /// Absorption opacity [cm⁻¹] at `reference_energy`, `opacity[species][flavour]`.
    pub opacity: [[Float; NF]; NM],
    /// Energy at which `opacity` is quoted [MeV].
    pub reference_energy: Float,
    /// Neutrino chemical potentials [MeV], `chemical_potential[species][flavour]`.
    pub chemical_potential: [[Float; NF]; NM],
}

impl Default for ThermalMedium {
    fn default() -> Self {
        Self {
            opacity: [[1.0e-6, 0.0], [1.0e-6, 0.0]],
            reference_energy: 10.0,
            chemical_potential: [[0.0; NF]; NM],
        }
    }
}

impl Medium for ThermalMedium {
    fn emissivity(&self, fluid: &Fluid, species: Species, flavor: Flavor, energy: Float) -> Float {
        // η = κ f_eq / (1 − f_eq)
        let mu = self.chemical_potential[species.index()][flavor.index()] * MEV;
        let t = fluid.temperature * MEV;
        self.absorption(fluid, species, flavor, energy) * (-(energy - mu) / t).exp()
    }

    fn absorption(&self, _fluid: &Fluid, species: Species, flavor: Flavor, energy: Float) -> Float {
        let x = energy / (self.reference_energy * MEV);
        self.opacity[species.index()][flavor.index()] * x * x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermal_equilibrium_is_fermi_dirac() {
        let medium = ThermalMedium {
            chemical_potential: [[3.0, 0.0], [-3.0, 0.0]],
            ..ThermalMedium::default()
        };
        let fluid = Fluid::new(1.0e10, 5.0, 0.3);
        let energy = 12.0 * MEV;
        let feq = medium.equilibrium(&fluid, Species::Matter, Flavor::E, energy);
        let expected = 1.0 / (((12.0 - 3.0) / 5.0 as Float).exp() + 1.0);
        assert!((feq - expected).abs() < 1e-12);
        // μ-flavour has no absorption and therefore no emission
        assert_eq!(medium.equilibrium(&fluid, Species::Matter, Flavor::Mu, energy), 0.0);
    }

    #[test]
    fn matter_potential_scales_with_electron_density() {
        let medium = ThermalMedium::default();
        let v1 = medium.matter_potential(&Fluid::new(1.0e8, 5.0, 0.5));
        let v2 = medium.matter_potential(&Fluid::new(2.0e8, 5.0, 0.5));
        assert!((v2[0] / v1[0] - 2.0).abs() < 1e-12);
        assert_eq!(v1[1], 0.0);
    }

    #[test]
    fn fluid_validation() {
        assert!(Fluid::new(1.0, 1.0, 0.5).validate().is_ok());
        assert!(Fluid::new(-1.0, 1.0, 0.5).validate().is_err());
        assert!(Fluid::new(1.0, 0.0, 0.5).validate().is_err());
        assert!(Fluid::new(1.0, 1.0, 1.5).validate().is_err());
    }
}
