//! Runtime task representation
//!
//! This module converts configuration tasks into the form the registry and
//! executor work with, and prepares their commands for execution.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{interpolate, interpolate_list, Context, Invocation};

/// Runtime task representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Prerequisites, in declared order
    pub prerequisites: Vec<String>,

    /// Command to run; `None` for pure aggregators
    pub command: Option<Command>,

    /// Whether the invoker may request this task directly
    pub is_entry_point: bool,
}

impl Task {
    /// Create a task with no prerequisites and no command
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            usage: None,
            prerequisites: Vec::new(),
            command: None,
            is_entry_point: true,
        }
    }

    /// Add prerequisites
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Set the command
    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    /// Hide from the invoker
    pub fn private(mut self) -> Self {
        self.is_entry_point = false;
        self
    }

    /// Create a new task from configuration
    pub fn from_config(name: String, config: &config::Task) -> Self {
        Task {
            name,
            usage: config.usage.clone(),
            prerequisites: config.deps.clone(),
            command: config.run.clone().map(Command::from_config),
            is_entry_point: !config.private,
        }
    }

    /// Whether this task only aggregates its prerequisites
    pub fn is_aggregator(&self) -> bool {
        self.command.is_none()
    }

    /// Prepare the task's command for execution, if it has one
    pub fn invocation(&self, ctx: &Context) -> ExecutionResult<Option<Invocation>> {
        match &self.command {
            Some(command) => command.prepare(&self.name, ctx).map(Some),
            None => Ok(None),
        }
    }
}

/// Runtime representation of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A line run through the context's interpreter
    Shell {
        line: String,
        print: Option<String>,
        quiet: bool,
        dir: Option<String>,
    },

    /// A program spawned directly with arguments
    Exec {
        program: String,
        args: Vec<String>,
        print: Option<String>,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Shell line with default options
    pub fn shell(line: impl Into<String>) -> Self {
        Command::Shell {
            line: line.into(),
            print: None,
            quiet: false,
            dir: None,
        }
    }

    /// Create from config
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(line) => Command::shell(line),
            config::Command::Complex(detail) => match detail.args {
                Some(args) => Command::Exec {
                    program: detail.exec,
                    args,
                    print: detail.print,
                    quiet: detail.quiet,
                    dir: detail.dir,
                },
                None => Command::Shell {
                    line: detail.exec,
                    print: detail.print,
                    quiet: detail.quiet,
                    dir: detail.dir,
                },
            },
        }
    }

    /// Interpolate variables and build the invocation for `task`
    pub fn prepare(&self, task: &str, ctx: &Context) -> ExecutionResult<Invocation> {
        let interpolation_error = |source| ExecutionError::Interpolation {
            task: task.to_string(),
            source,
        };

        let (program, args, print, quiet, dir) = match self {
            Command::Shell {
                line,
                print,
                quiet,
                dir,
            } => {
                let line = interpolate(line, &ctx.vars).map_err(interpolation_error)?;
                let (program, prefix) = ctx
                    .interpreter
                    .split_first()
                    .ok_or_else(|| ExecutionError::EmptyCommand {
                        task: task.to_string(),
                    })?;
                let mut args = prefix.to_vec();
                args.push(line);
                (program.clone(), args, print, *quiet, dir)
            }
            Command::Exec {
                program,
                args,
                print,
                quiet,
                dir,
            } => {
                let program = interpolate(program, &ctx.vars).map_err(interpolation_error)?;
                let args = interpolate_list(args, &ctx.vars).map_err(interpolation_error)?;
                (program, args, print, *quiet, dir)
            }
        };

        if program.trim().is_empty() {
            return Err(ExecutionError::EmptyCommand {
                task: task.to_string(),
            });
        }

        let display = match print {
            Some(print) => interpolate(print, &ctx.vars).map_err(interpolation_error)?,
            None => match self {
                Command::Shell { .. } => args.last().cloned().unwrap_or_default(),
                Command::Exec { .. } => std::iter::once(program.as_str())
                    .chain(args.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" "),
            },
        };

        let dir = match dir {
            Some(dir) => {
                let dir = interpolate(dir, &ctx.vars).map_err(interpolation_error)?;
                ctx.working_dir.join(dir)
            }
            None => ctx.working_dir.clone(),
        };

        Ok(Invocation {
            program,
            args,
            dir,
            display,
            quiet,
        })
    }
}
