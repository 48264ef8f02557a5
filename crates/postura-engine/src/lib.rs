//! POSTURA Engine - posture quality from a noisy keypoint stream
//!
//! Per frame:
//! 1. Gate on keypoint visibility
//! 2. Average ears and shoulders
//! 3. Compute the neck angle (180° = ear straight above shoulder)
//! 4. Classify against thresholds
//! 5. Run the dwell timer: sustained poor posture raises an alert
//!
//! The engine owns all of its state and never reads a clock; every call
//! carries the caller's timestamp.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod signal;
pub mod state;
pub mod status;
pub mod thresholds;

pub use config::*;
pub use engine::*;
pub use geometry::*;
pub use signal::*;
pub use state::*;
pub use status::*;
pub use thresholds::*;
