// Domain layer: chart data, the drawing surface and the ports to the outside world.

pub mod date;
pub mod figure;
pub mod model;
pub mod ports;
