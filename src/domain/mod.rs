//! Domain layer: entities and the traits the rest of the system is
//! built against.

pub mod entities;
pub mod repositories;
