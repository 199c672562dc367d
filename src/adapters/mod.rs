// Adapters layer: concrete implementations of the domain ports.

pub mod plot;
pub mod storage;
pub mod typeset;
pub mod viewer;
