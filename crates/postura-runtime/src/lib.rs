//! POSTURA Runtime - drives a PostureEngine from a live or recorded frame source
//!
//! - `session`: tokio task owning one engine; frames and auto-hide wake-ups are
//!   serialized through a single `select!` loop
//! - `replay`: newline-delimited JSON frames in, JSON status records out
//! - `notify`: notifiers that forward alert signals
//! - `config` / `logging`: session configuration and tracing bootstrap

pub mod config;
pub mod logging;
pub mod notify;
pub mod replay;
pub mod session;

pub use config::*;
pub use logging::*;
pub use notify::*;
pub use replay::*;
pub use session::*;
