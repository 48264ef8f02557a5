//! POSTURA Time - clocks and deferred work
//!
//! The posture engine runs on a single logical timeline driven by caller
//! timestamps. This crate provides:
//! - `Clock` implementations that produce those timestamps
//! - `DeferredTimer`, a cancellable single-slot timer evaluated on that timeline

pub mod clock;
pub mod timer;

pub use clock::*;
pub use timer::*;
