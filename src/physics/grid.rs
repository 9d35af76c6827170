//! Neutrino energy bins.

use serde::{Deserialize, Serialize};

use crate::{
    Float,
    constants::{H, MEV, PHASE_SPACE},
    error::Error,
};

/// Energy bins with their centres and widths.
///
/// Both are kept and serialised in MeV; the accessors return erg.
/// Deserialisation goes through [`EnergyGrid::from_mev`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct EnergyGrid {
    energies: Vec<Float>,
    widths: Vec<Float>,
}

#[derive(Deserialize)]
struct RawGrid {
    energies: Vec<Float>,
    widths: Vec<Float>,
}

impl TryFrom<RawGrid> for EnergyGrid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self, Error> {
        Self::from_mev(&raw.energies, &raw.widths)
    }
}

impl EnergyGrid {
    /// Build a grid from bin centres and widths given in MeV.
    pub fn from_mev(energies: &[Float], widths: &[Float]) -> Result<Self, Error> {
        if energies.is_empty() {
            return Err(Error::InvalidGrid("at least one energy bin is required".into()));
        }
        if energies.len() != widths.len() {
            return Err(Error::InvalidGrid(format!(
                "{} energies but {} widths",
                energies.len(),
                widths.len()
            )));
        }
        if let Some(e) = energies.iter().find(|e| !(**e > 0.0 && e.is_finite())) {
            return Err(Error::InvalidGrid(format!("energy must be positive (got {e})")));
        }
        if let Some(w) = widths.iter().find(|w| !(**w > 0.0 && w.is_finite())) {
            return Err(Error::InvalidGrid(format!("bin width must be positive (got {w})")));
        }
        Ok(Self {
            energies: energies.to_vec(),
            widths: widths.to_vec(),
        })
    }

    /// `n` equally wide bins covering `[emin, emax]` MeV.
    pub fn uniform(n: usize, emin: Float, emax: Float) -> Result<Self, Error> {
        if n == 0 || !(emax > emin) || !(emin >= 0.0) {
            return Err(Error::InvalidGrid(format!(
                "cannot split [{emin}, {emax}] MeV into {n} bins"
            )));
        }
        let width = (emax - emin) / n as Float;
        let energies: Vec<Float> = (0..n).map(|i| emin + (i as Float + 0.5) * width).collect();
        Self::from_mev(&energies, &vec![width; n])
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Bin centre [erg].
    pub fn energy(&self, i: usize) -> Float {
        self.energies[i] * MEV
    }

    /// Bin width [erg].
    pub fn width(&self, i: usize) -> Float {
        self.widths[i] * MEV
    }

    /// Number density [cm⁻³] carried by unit occupation in bin `i`,
    /// `4π ν² Δν / c³`.
    pub fn phase_space(&self, i: usize) -> Float {
        let nu = self.energy(i) / H;
        let dnu = self.width(i) / H;
        PHASE_SPACE * nu * nu * dnu
    }
}
