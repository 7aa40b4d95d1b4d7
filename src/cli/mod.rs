//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, variable overrides, task
//! listing, dry runs and shell completion.

pub mod app;

// Re-export main types
pub use app::*;
