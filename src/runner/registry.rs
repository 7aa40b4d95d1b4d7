//! Task registry
//!
//! Immutable name → task mapping built once at startup.

use crate::config::Config;
use crate::error::{ConfigError, ConfigResult};
use crate::runner::Task;
use std::collections::{BTreeMap, HashSet};

/// The set of tasks available to the executor
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tasks: BTreeMap<String, Task>,
}

impl Registry {
    /// Build a registry, rejecting duplicate task names
    pub fn new<I>(tasks: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = Task>,
    {
        let mut map = BTreeMap::new();
        for task in tasks {
            if map.contains_key(&task.name) {
                return Err(ConfigError::DuplicateTask(task.name));
            }
            map.insert(task.name.clone(), task);
        }
        Ok(Registry { tasks: map })
    }

    /// Build a registry from a parsed configuration
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Self::new(
            config
                .tasks
                .iter()
                .map(|(name, task)| Task::from_config(name.clone(), task)),
        )
    }

    /// Look up a task by name
    pub fn lookup(&self, name: &str) -> ConfigResult<&Task> {
        self.tasks.get(name).ok_or_else(|| ConfigError::UnknownTask {
            name: name.to_string(),
            referenced_by: None,
        })
    }

    /// Names of tasks the invoker may request, sorted
    pub fn entry_points(&self) -> Vec<&str> {
        self.tasks
            .values()
            .filter(|task| task.is_entry_point)
            .map(|task| task.name.as_str())
            .collect()
    }

    /// All tasks, sorted by name
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check every prerequisite reference and reject cycles.
    ///
    /// Tasks are checked in name order so the reported error is stable.
    pub fn validate(&self) -> ConfigResult<()> {
        for task in self.tasks.values() {
            for prerequisite in &task.prerequisites {
                if !self.tasks.contains_key(prerequisite) {
                    return Err(ConfigError::UnknownTask {
                        name: prerequisite.clone(),
                        referenced_by: Some(task.name.clone()),
                    });
                }
            }
        }

        let mut finished = HashSet::new();
        for name in self.tasks.keys() {
            let mut stack = Vec::new();
            self.check_cycle(name, &mut finished, &mut stack)?;
        }

        Ok(())
    }

    fn check_cycle<'a>(
        &'a self,
        name: &'a str,
        finished: &mut HashSet<&'a str>,
        stack: &mut Vec<&'a str>,
    ) -> ConfigResult<()> {
        if finished.contains(name) {
            return Ok(());
        }

        if let Some(start) = stack.iter().position(|entry| *entry == name) {
            let mut chain: Vec<&str> = stack[start..].to_vec();
            chain.push(name);
            return Err(ConfigError::CyclicDependency {
                task: name.to_string(),
                chain: chain.join(" -> "),
            });
        }

        let task = self.lookup(name)?;
        stack.push(name);
        for prerequisite in &task.prerequisites {
            self.check_cycle(prerequisite, finished, stack)?;
        }
        stack.pop();
        finished.insert(name);

        Ok(())
    }
}
