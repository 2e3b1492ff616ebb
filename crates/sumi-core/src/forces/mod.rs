//! Per-particle accelerations, in pixels per reference frame².
pub mod pointer;
pub mod wind;
