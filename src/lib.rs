//! shiprun - a small YAML-based release task runner
//!
//! Tasks name their prerequisites and an optional command. Running a task
//! runs every transitive prerequisite exactly once, in a deterministic
//! prerequisites-first order, and stops at the first failing command.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, ShiprunError};

/// Current version of shiprun
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
