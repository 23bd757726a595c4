// Domain layer: output model and the probe port. No platform code here.

pub mod model;
pub mod ports;
