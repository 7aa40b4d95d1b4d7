//! Command execution
//!
//! Every external process the runner starts goes through a [`CommandRunner`].
//! [`ShellRunner`] is the real one; the executor is generic over the trait.

use crate::runner::Context;
use std::io;
use std::path::PathBuf;
use std::process::{Command as StdCommand, Stdio};

/// A fully prepared external process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to spawn
    pub program: String,

    /// Arguments passed to the program
    pub args: Vec<String>,

    /// Working directory for the process
    pub dir: PathBuf,

    /// What to echo before running
    pub display: String,

    /// Suppress the echo
    pub quiet: bool,
}

/// Exit status reported by a [`CommandRunner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs prepared invocations and reports their exit status
pub trait CommandRunner {
    /// Run the invocation to completion. An `Err` means the process could
    /// not be started at all.
    fn run(&mut self, invocation: &Invocation, ctx: &Context) -> io::Result<CommandStatus>;
}

/// Runs invocations as child processes with inherited stdio
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, invocation: &Invocation, ctx: &Context) -> io::Result<CommandStatus> {
        let mut command = StdCommand::new(&invocation.program);
        command.args(&invocation.args);
        command.current_dir(&invocation.dir);

        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        // Export context variables so tools like envsubst can see them
        for (key, value) in &ctx.vars {
            command.env(key, value);
        }

        let status = command.status()?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }
}
