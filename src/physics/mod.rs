//! Flavour physics: basis parametrisation, vacuum and matter mixing, medium.

pub mod adiabatic;
pub mod basis;
pub mod grid;
pub mod medium;
pub mod vacuum;
