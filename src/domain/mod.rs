// Domain layer: core models and ports (interfaces). No external dependencies beyond std/chrono when needed.

pub mod model;
pub mod ports;
