//! Task execution engine
//!
//! This module handles the task registry, dependency resolution, and
//! running task commands as external processes.

pub mod command;
pub mod context;
pub mod executor;
pub mod interpolate;
pub mod registry;
pub mod task;

// Re-export main types
pub use command::*;
pub use context::*;
pub use executor::*;
pub use interpolate::*;
pub use registry::*;
pub use task::*;
