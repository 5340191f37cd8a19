// Domain layer: rule and report models plus the ports the engine talks to.

pub mod model;
pub mod ports;
