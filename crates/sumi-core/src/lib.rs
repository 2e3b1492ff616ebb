//! Pointer-reactive ink, petal and tilt engine.
//!
//! Everything in this crate is browser-independent: surfaces draw through the
//! [`raster::DrawTarget`] trait and frame loops are driven through
//! [`scheduler::FrameClock`], so the whole engine runs (and is tested)
//! natively. The `sumi-wasm` crate supplies the browser implementations.

pub mod config;
pub mod error;
pub mod forces;
pub mod highlight;
pub mod ink;
pub mod input;
pub mod math;
pub mod particle;
pub mod quality;
pub mod raster;
pub mod scheduler;
pub mod surface;
pub mod system;
pub mod tilt;
