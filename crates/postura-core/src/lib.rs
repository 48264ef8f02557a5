//! POSTURA Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every POSTURA crate:
//! - Keypoints and frames as delivered by a pose estimator
//! - Landmark schemes (which index is which ear/shoulder)
//! - Monotonic time (MonoTime)
//! - Posture quality
//! - Error types

pub mod error;
pub mod keypoint;
pub mod quality;
pub mod time;

pub use error::*;
pub use keypoint::*;
pub use quality::*;
pub use time::*;
