//! Physical constants and unit conversions (cgs).
//!
//! Energies are carried in erg, distances in cm and number densities in
//! cm⁻³. Hamiltonians are energies, so a phase advances by `H / ħc` per cm.

use crate::Float;

/// Speed of light [cm/s]
pub const C: Float = 2.99792458e10;

/// Planck constant [erg s]
pub const H: Float = 6.62607015e-27;

/// Reduced Planck constant [erg s]
pub const HBAR: Float = H / (2.0 * std::f64::consts::PI);

/// ħc [erg cm]
pub const HBARC: Float = HBAR * C;

/// Electron volt [erg]
pub const EV: Float = 1.602176634e-12;

/// Mega electron volt [erg]
pub const MEV: Float = 1.0e6 * EV;

/// Giga electron volt [erg]
pub const GEV: Float = 1.0e9 * EV;

/// Atomic mass unit [g]
pub const M_U: Float = 1.66053906660e-24;

/// Fermi coupling constant G_F/(ħc)³ [GeV⁻²]
pub const GF_GEV: Float = 1.1663787e-5;

/// Fermi coupling constant [erg cm³]
pub const GF: Float = GF_GEV / (GEV * GEV) * HBARC * HBARC * HBARC;

/// √2 G_F [erg cm³], the prefactor of every forward-scattering potential.
pub const SQRT2_GF: Float = std::f64::consts::SQRT_2 * GF;

/// Phase-space weight 4π/c³ turning `ν² dν` into a number density.
pub const PHASE_SPACE: Float = 4.0 * std::f64::consts::PI / (C * C * C);
