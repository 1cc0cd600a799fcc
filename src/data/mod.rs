//! Data layer: the accumulated spectrum store and axis tick generation.

pub mod spectrum;
pub mod ticks;
