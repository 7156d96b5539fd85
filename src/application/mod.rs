//! Application layer: use cases built on domain traits.

pub mod services;
pub mod workers;
