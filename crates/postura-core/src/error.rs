//! Error types for POSTURA
//!
//! Per-frame processing never fails. Errors only surface at the edges:
//! configuration, replay input and session plumbing.

use thiserror::Error;

/// Core POSTURA errors
#[derive(Error, Debug)]
pub enum PosturaError {
    // Configuration errors
    #[error("Invalid thresholds: good ({good}) must exceed warning ({warning}) and neither may exceed 180")]
    InvalidThresholds { good: f64, warning: f64 },

    #[error("Invalid visibility bound: {0} (expected 0.0..=1.0)")]
    InvalidVisibility(f64),

    #[error("Warning duration must be non-zero")]
    ZeroWarningDuration,

    #[error("Configuration error: {0}")]
    Config(String),

    // Replay / input errors
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Session errors
    #[error("Session closed")]
    SessionClosed,
}

/// Result type for POSTURA operations
pub type PosturaResult<T> = Result<T, PosturaError>;
