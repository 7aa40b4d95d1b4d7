//! Configuration validation
//!
//! Structural checks on a parsed configuration. Graph checks (unknown
//! prerequisites, cycles) live on the task registry.

use crate::config::types::{Command, Config, Task};
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(interpreter) = &config.interpreter {
        if interpreter.first().map_or(true, |program| program.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "interpreter must name a program".to_string(),
            ));
        }
    }

    for key in config.env.keys() {
        validate_variable_name(key)?;
    }

    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    validate_task_name(name)?;

    for dep in &task.deps {
        if dep == name {
            return Err(ConfigError::CyclicDependency {
                task: name.to_string(),
                chain: format!("{} -> {}", name, name),
            });
        }
    }

    if let Some(Command::Complex(detail)) = &task.run {
        if detail.exec.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "task '{}' has an empty exec",
                name
            )));
        }
    }

    Ok(())
}

fn validate_task_name(name: &str) -> ConfigResult<()> {
    if name.is_empty() || name.contains(char::is_whitespace) || name.contains('=') {
        return Err(ConfigError::Invalid(format!(
            "invalid task name '{}': names must be non-empty without whitespace or '='",
            name
        )));
    }
    Ok(())
}

/// Variable names must be usable as environment variable keys
pub fn validate_variable_name(name: &str) -> ConfigResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "invalid variable name '{}'",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CommandDetail;

    fn task_with_deps(deps: &[&str]) -> Task {
        Task {
            deps: deps.iter().map(|d| d.to_string()).collect(),
            ..Task::default()
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let mut config = Config::default();
        config.tasks.insert(
            "render".to_string(),
            Task {
                run: Some(Command::Simple("envsubst".to_string())),
                ..Task::default()
            },
        );
        config.tasks.insert("release".to_string(), task_with_deps(&["render"]));

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_self_dependency() {
        let mut config = Config::default();
        config.tasks.insert("loop".to_string(), task_with_deps(&["loop"]));

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::CyclicDependency { ref task, .. }) if task == "loop"
        ));
    }

    #[test]
    fn test_validate_empty_interpreter() {
        let config = Config {
            interpreter: Some(vec![]),
            ..Config::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_empty_exec() {
        let mut config = Config::default();
        config.tasks.insert(
            "push".to_string(),
            Task {
                run: Some(Command::Complex(CommandDetail {
                    exec: "  ".to_string(),
                    args: None,
                    dir: None,
                    print: None,
                    quiet: false,
                })),
                ..Task::default()
            },
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_task_names() {
        assert!(validate_task_name("render").is_ok());
        assert!(validate_task_name("render-predict").is_ok());
        assert!(validate_task_name("").is_err());
        assert!(validate_task_name("two words").is_err());
        assert!(validate_task_name("A=B").is_err());
    }

    #[test]
    fn test_validate_variable_names() {
        assert!(validate_variable_name("MODEL_DESTINATION").is_ok());
        assert!(validate_variable_name("_private").is_ok());
        assert!(validate_variable_name("1ST").is_err());
        assert!(validate_variable_name("WITH-DASH").is_err());
        assert!(validate_variable_name("").is_err());
    }
}
