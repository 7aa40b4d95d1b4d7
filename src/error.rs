//! Error types for shiprun

use std::io;
use thiserror::Error;

/// Result type alias for shiprun operations
pub type Result<T> = std::result::Result<T, ShiprunError>;

/// Main error type for shiprun
///
/// Messages never repeat their source; print with `{:#}` (anyhow) or walk
/// `source()` to get the full chain.
#[derive(Error, Debug)]
pub enum ShiprunError {
    /// Configuration and task graph errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error")]
    Yaml(#[from] serde_yaml::Error),
}

impl ShiprunError {
    /// Process exit code to report for this error.
    ///
    /// A failed command propagates its own exit code when it has one.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShiprunError::Execution(ExecutionError::CommandFailed { code: Some(code), .. })
                if *code != 0 =>
            {
                *code
            }
            _ => 1,
        }
    }
}

/// Configuration parsing, validation and resolution errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task '{0}' is defined more than once")]
    DuplicateTask(String),

    #[error("Task '{name}' is not defined{}", referenced_by_suffix(.referenced_by))]
    UnknownTask {
        name: String,
        referenced_by: Option<String>,
    },

    #[error("Cyclic dependency on task '{task}': {chain}")]
    CyclicDependency { task: String, chain: String },

    #[error("Task '{0}' is private and cannot be run directly")]
    NotEntryPoint(String),

    #[error("Invalid variable override '{0}' (expected NAME=VALUE)")]
    InvalidOverride(String),

    #[error("No task given: {0}")]
    MissingTask(String),
}

fn referenced_by_suffix(referenced_by: &Option<String>) -> String {
    match referenced_by {
        Some(task) => format!(" (required by '{}')", task),
        None => String::new(),
    }
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{task}' failed: command exited with {}", describe_code(.code))]
    CommandFailed { task: String, code: Option<i32> },

    #[error("Task '{task}' failed: could not start '{program}'")]
    Spawn {
        task: String,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Task '{task}' has an invalid command")]
    Interpolation {
        task: String,
        #[source]
        source: InterpolationError,
    },

    #[error("Task '{task}' has an empty command")]
    EmptyCommand { task: String },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Recursive interpolation detected for variable '{0}'")]
    RecursiveInterpolation(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;
