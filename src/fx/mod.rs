// Signal-processing stages. Each stage is a pure function of the buffer,
// its parameters, and (where noted) an explicit random source; no stage
// keeps state across calls.

pub mod background;
pub mod degrade;
pub mod distortion;
pub mod dynamics;
pub mod filter;
pub mod noise;
pub mod transient;
