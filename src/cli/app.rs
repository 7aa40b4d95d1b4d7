//! Main CLI application

use crate::config::{
    load_config_auto, parse_config_file, validate_config, validate_variable_name, Config,
    ConfigSource,
};
use crate::error::{ConfigError, ConfigResult, ShiprunError};
use crate::runner::{Context, Executor, Registry, Verbosity};
use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::Colorize;
use std::collections::HashMap;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Dotenv file picked up next to the configuration when present
pub const DEFAULT_ENV_FILE: &str = ".env";

/// CLI application
pub struct App {
    /// Parsed configuration
    config: Config,
    /// Where the configuration came from
    source: ConfigSource,
    /// Validated task registry
    registry: Registry,
}

impl App {
    /// Load, validate and index the configuration
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let (config, source) = match file {
            Some(path) => {
                let config = parse_config_file(path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                (config, ConfigSource::File(path.to_path_buf()))
            }
            None => load_config_auto().context("failed to load configuration")?,
        };

        Ok(Self::from_config(config, source)?)
    }

    /// Build the app from an already parsed configuration
    pub fn from_config(config: Config, source: ConfigSource) -> Result<Self, ShiprunError> {
        validate_config(&config)?;
        let registry = Registry::from_config(&config)?;
        registry.validate()?;

        Ok(App {
            config,
            source,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Create the execution context for this configuration
    pub fn context(&self, vars: HashMap<String, String>, verbosity: Verbosity) -> Context {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut ctx = Context::new()
            .with_working_dir(self.source.base_dir(&cwd))
            .with_vars(vars)
            .with_verbosity(verbosity);

        if let Some(interpreter) = &self.config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        ctx
    }

    /// Write the entry points and their usage
    pub fn list(&self, out: &mut impl Write) -> io::Result<()> {
        let entry_points = self.registry.entry_points();
        let width = entry_points.iter().map(|name| name.len()).max().unwrap_or(0);

        if let Some(usage) = &self.config.usage {
            writeln!(out, "{}", usage)?;
            writeln!(out)?;
        }
        writeln!(out, "{}", "Tasks:".bold())?;

        for name in entry_points {
            let usage = self
                .registry
                .lookup(name)
                .ok()
                .and_then(|task| task.usage.as_deref())
                .unwrap_or("");
            let padded = format!("{:<width$}", name, width = width);
            writeln!(out, "  {}  {}", padded.bold(), usage)?;
        }

        Ok(())
    }

    /// Write the resolved order and each prepared command without running anything
    pub fn dry_run(
        &self,
        task: &str,
        ctx: &Context,
        out: &mut impl Write,
    ) -> Result<(), ShiprunError> {
        let executor = Executor::new(&self.registry);
        for (index, task) in executor.plan(task)?.into_iter().enumerate() {
            match task.invocation(ctx)? {
                Some(invocation) => {
                    writeln!(out, "{}. {}: {}", index + 1, task.name, invocation.display)?
                }
                None => writeln!(out, "{}. {} (no command)", index + 1, task.name)?,
            }
        }
        Ok(())
    }

    /// Run a task and its prerequisites
    pub fn run_task(&self, task: &str, ctx: &Context) -> Result<(), ShiprunError> {
        Executor::new(&self.registry).run(task, ctx)
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("shiprun")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render, lint and publish model releases from a YAML task file")
        .arg(
            Arg::new("task")
                .value_name("TASK")
                .help("Task to run (lists tasks when omitted); may follow NAME=VALUE overrides"),
        )
        .arg(
            Arg::new("overrides")
                .value_name("NAME=VALUE")
                .help("Variables exported to every command")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to shiprun.yml config file"),
        )
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Dotenv file with default variables [default: .env next to the config]"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List runnable tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print the execution order without running anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .help("Print shell completions and exit"),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Split the positionals into the requested task and `NAME=VALUE` overrides.
///
/// The first value without `=` is the task, wherever it appears.
fn split_positionals(matches: &ArgMatches) -> (Option<String>, Vec<String>) {
    let positionals = matches.get_one::<String>("task").into_iter().chain(
        matches
            .get_many::<String>("overrides")
            .into_iter()
            .flatten(),
    );

    let mut task = None;
    let mut overrides = Vec::new();
    for value in positionals {
        if task.is_none() && !value.contains('=') {
            task = Some(value.clone());
        } else {
            overrides.push(value.clone());
        }
    }

    (task, overrides)
}

/// Parse a `NAME=VALUE` override
pub fn parse_override(raw: &str) -> ConfigResult<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(raw.to_string()))?;
    validate_variable_name(name).map_err(|_| ConfigError::InvalidOverride(raw.to_string()))?;
    Ok((name.to_string(), value.to_string()))
}

/// Read a dotenv file into ordered pairs
pub fn read_env_file(path: &Path) -> ConfigResult<Vec<(String, String)>> {
    let invalid = |e: dotenvy::Error| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    };

    dotenvy::from_path_iter(path)
        .map_err(invalid)?
        .map(|item| item.map_err(invalid))
        .collect()
}

/// Merge variable sources.
///
/// Config `env` and dotenv values are defaults and never shadow a variable
/// already present in the environment; overrides shadow everything.
pub fn build_vars(
    config_env: impl IntoIterator<Item = (String, String)>,
    dotenv: impl IntoIterator<Item = (String, String)>,
    overrides: &[String],
    is_set: impl Fn(&str) -> bool,
) -> ConfigResult<HashMap<String, String>> {
    let mut vars = HashMap::new();

    for (key, value) in config_env.into_iter().chain(dotenv) {
        if !is_set(&key) {
            vars.insert(key, value);
        }
    }

    for raw in overrides {
        let (key, value) = parse_override(raw)?;
        vars.insert(key, value);
    }

    Ok(vars)
}

fn missing_task(reason: &str) -> ShiprunError {
    ConfigError::MissingTask(reason.to_string()).into()
}

/// Run the CLI application with process arguments
pub fn run() -> anyhow::Result<()> {
    run_with(build_command().get_matches())
}

/// Run the CLI application with parsed arguments
pub fn run_with(matches: ArgMatches) -> anyhow::Result<()> {
    if let Some(shell) = matches.get_one::<Shell>("completions") {
        clap_complete::generate(*shell, &mut build_command(), "shiprun", &mut io::stdout());
        return Ok(());
    }

    let verbosity = get_verbosity(&matches);
    let app = App::load(matches.get_one::<PathBuf>("file").map(PathBuf::as_path))?;

    if matches.get_flag("list") {
        app.list(&mut io::stdout())?;
        return Ok(());
    }

    let (task, overrides) = split_positionals(&matches);
    let task = match task {
        Some(task) => task,
        None if matches.get_flag("dry-run") => {
            return Err(missing_task("--dry-run needs a task to resolve").into());
        }
        None if !overrides.is_empty() => {
            return Err(missing_task("variable overrides need a task to run").into());
        }
        None => {
            app.list(&mut io::stdout())?;
            return Ok(());
        }
    };

    let cwd = env::current_dir().context("failed to get current directory")?;
    let dotenv = match matches.get_one::<PathBuf>("env-file") {
        Some(path) => read_env_file(path)?,
        None => {
            let path = app.source().base_dir(&cwd).join(DEFAULT_ENV_FILE);
            if path.is_file() {
                read_env_file(&path)?
            } else {
                Vec::new()
            }
        }
    };

    let vars = build_vars(
        app.config.env.clone(),
        dotenv,
        &overrides,
        |key| env::var_os(key).is_some(),
    )?;
    let ctx = app.context(vars, verbosity);
    ctx.print_debug(&format!("Configuration: {:?}", app.source()));

    if matches.get_flag("dry-run") {
        app.dry_run(&task, &ctx, &mut io::stdout())?;
    } else {
        app.run_task(&task, &ctx)?;
    }

    Ok(())
}
