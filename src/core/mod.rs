//! Core traits and types used throughout the library.

pub mod matrix;
pub mod ode;
pub mod species;
pub mod status;
