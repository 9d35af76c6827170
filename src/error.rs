//! Errors for the flavour evolution.

use thiserror::Error;

use crate::Float;

/// Failures reported by construction and integration entry points.
///
/// Configuration problems are caught before any integration happens. The
/// numerical variants abort a run: a corrupted state would invalidate every
/// later output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("vacuum eigenvalues are degenerate (k0 = {0:e} erg); hierarchy is neither normal nor inverted")]
    DegenerateHierarchy(Float),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("invalid energy grid: {0}")]
    InvalidGrid(String),
    #[error("non-finite value in the mixing-angle state at r = {r:e} cm")]
    NonFinite { r: Float },
    #[error("step size underflow at r = {r:e} cm (dr = {dr:e} cm)")]
    StepSizeTooSmall { r: Float, dr: Float },
    #[error("interaction error {error:e} exceeds accuracy {accuracy:e} at r = {r:e} cm")]
    InteractionOverrun { r: Float, error: Float, accuracy: Float },
}
