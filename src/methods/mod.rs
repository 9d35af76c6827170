// Numerical methods

pub mod cashkarp;
pub mod result;
pub mod settings;
pub mod tableau;
