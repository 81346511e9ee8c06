// Domain layer: fault and score models plus the ports the core depends on.

pub mod model;
pub mod ports;
