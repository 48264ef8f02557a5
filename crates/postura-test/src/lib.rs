//! POSTURA Test Harness - synthetic poses and scripted timelines
//!
//! This crate provides:
//! - Pose synthesis for an exact neck angle, with optional seeded noise
//! - Scripted frame timelines run against an engine on a manual clock
//! - Predefined scenarios (sustained slouch, brief recovery, dropouts)

pub mod scenario;
pub mod synth;

pub use scenario::*;
pub use synth::*;
