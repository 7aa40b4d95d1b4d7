//! Built-in release pipeline
//!
//! Used when no configuration file is found. Renders `cog.yaml` from its
//! template, formats the project, and publishes the model.

use crate::config::types::{Command, Config, Task};

/// Aggregate task that runs the whole pipeline
pub const RELEASE_TASK: &str = "release";

/// Template and output paths for the rendered deployment configuration
pub const TEMPLATE_PATH: &str = "cog.yaml.template";
pub const RENDERED_PATH: &str = "cog.yaml";

/// The compiled-in render/lint/push/release task table
pub fn release_pipeline() -> Config {
    let mut config = Config {
        name: Some("shiprun".to_string()),
        usage: Some("Render, lint and publish a model release".to_string()),
        ..Config::default()
    };

    config.tasks.insert(
        "render".to_string(),
        Task {
            usage: Some(format!("Render {} from {}", RENDERED_PATH, TEMPLATE_PATH)),
            run: Some(Command::Simple(format!(
                "envsubst < {} > {}",
                TEMPLATE_PATH, RENDERED_PATH
            ))),
            ..Task::default()
        },
    );

    config.tasks.insert(
        "lint".to_string(),
        Task {
            usage: Some("Format sources and sort imports".to_string()),
            run: Some(Command::Simple("black . && isort .".to_string())),
            ..Task::default()
        },
    );

    config.tasks.insert(
        "push".to_string(),
        Task {
            usage: Some("Publish the model with cog push".to_string()),
            deps: vec!["render".to_string()],
            run: Some(Command::Simple("cog push ${MODEL_DESTINATION}".to_string())),
            ..Task::default()
        },
    );

    config.tasks.insert(
        RELEASE_TASK.to_string(),
        Task {
            usage: Some("Lint, render and publish".to_string()),
            deps: vec!["lint".to_string(), "push".to_string()],
            ..Task::default()
        },
    );

    config
}
