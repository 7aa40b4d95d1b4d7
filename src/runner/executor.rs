//! Task executor
//!
//! Resolves a requested task into a prerequisites-first order and runs the
//! commands of that order one at a time, stopping at the first failure.

use crate::error::{ConfigError, ExecutionError, Result};
use crate::runner::{CommandRunner, Context, Registry, ShellRunner, Task};
use std::collections::HashSet;

/// Runs tasks from a registry through a command runner
pub struct Executor<'a, R: CommandRunner = ShellRunner> {
    registry: &'a Registry,
    runner: R,
}

impl<'a> Executor<'a, ShellRunner> {
    /// Executor that spawns real processes
    pub fn new(registry: &'a Registry) -> Self {
        Self::with_runner(registry, ShellRunner)
    }
}

impl<'a, R: CommandRunner> Executor<'a, R> {
    pub fn with_runner(registry: &'a Registry, runner: R) -> Self {
        Executor { registry, runner }
    }

    /// The underlying command runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Resolve `requested` into execution order.
    ///
    /// Depth-first, prerequisites in declared order, each task at the
    /// position of its first full resolution. Nothing is executed.
    pub fn resolve(&self, requested: &str) -> Result<Vec<String>> {
        Ok(resolve_order(self.registry, requested)?
            .into_iter()
            .map(|task| task.name.clone())
            .collect())
    }

    /// Resolve an entry point into the tasks to run, in order
    pub fn plan(&self, requested: &str) -> Result<Vec<&'a Task>> {
        let task = self.registry.lookup(requested)?;
        if !task.is_entry_point {
            return Err(ConfigError::NotEntryPoint(requested.to_string()).into());
        }
        Ok(resolve_order(self.registry, requested)?)
    }

    /// Run an entry point and all of its prerequisites.
    ///
    /// Every command is prepared before the first one starts, so resolution
    /// and interpolation errors never leave a half-run pipeline.
    pub fn run(&mut self, requested: &str, ctx: &Context) -> Result<()> {
        let order = self.plan(requested)?;
        ctx.print_debug(&format!(
            "Execution order: {}",
            order
                .iter()
                .map(|task| task.name.as_str())
                .collect::<Vec<_>>()
                .join(" -> ")
        ));

        let mut steps = Vec::with_capacity(order.len());
        for task in order {
            steps.push((task, task.invocation(ctx)?));
        }

        for (task, invocation) in steps {
            let Some(invocation) = invocation else {
                ctx.print_task_skip(&task.name, "no command");
                continue;
            };

            ctx.print_task_start(&task.name);
            if !invocation.quiet {
                ctx.print_command(&invocation.display);
            }

            let status = self
                .runner
                .run(&invocation, ctx)
                .map_err(|source| ExecutionError::Spawn {
                    task: task.name.clone(),
                    program: invocation.program.clone(),
                    source,
                })?;

            if !status.success() {
                return Err(ExecutionError::CommandFailed {
                    task: task.name.clone(),
                    code: status.code,
                }
                .into());
            }

            ctx.print_task_complete(&task.name);
        }

        Ok(())
    }
}

/// Depth-first topological order of everything `requested` needs
pub fn resolve_order<'r>(
    registry: &'r Registry,
    requested: &str,
) -> std::result::Result<Vec<&'r Task>, ConfigError> {
    let mut resolution = Resolution {
        registry,
        resolved: HashSet::new(),
        in_progress: Vec::new(),
        order: Vec::new(),
    };
    resolution.visit(requested, None)?;
    Ok(resolution.order)
}

struct Resolution<'r> {
    registry: &'r Registry,
    resolved: HashSet<&'r str>,
    in_progress: Vec<&'r str>,
    order: Vec<&'r Task>,
}

impl<'r> Resolution<'r> {
    fn visit(
        &mut self,
        name: &str,
        referenced_by: Option<&str>,
    ) -> std::result::Result<(), ConfigError> {
        if self.resolved.contains(name) {
            return Ok(());
        }

        if let Some(start) = self.in_progress.iter().position(|entry| *entry == name) {
            let mut chain = self.in_progress[start..].to_vec();
            chain.push(self.in_progress[start]);
            return Err(ConfigError::CyclicDependency {
                task: name.to_string(),
                chain: chain.join(" -> "),
            });
        }

        let registry = self.registry;
        let task = registry.lookup(name).map_err(|_| ConfigError::UnknownTask {
            name: name.to_string(),
            referenced_by: referenced_by.map(str::to_string),
        })?;

        self.in_progress.push(&task.name);
        for prerequisite in &task.prerequisites {
            self.visit(prerequisite, Some(task.name.as_str()))?;
        }
        self.in_progress.pop();

        self.resolved.insert(&task.name);
        self.order.push(task);
        Ok(())
    }
}
