//! Command-line interface for depstage.
//!
//! # Commands
//!
//! - `stage` - resolve the project's dependencies and stage them
//! - `plan` - resolve and print what `stage` would do, without writing
//! - `check` - load and validate the configuration only
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` - debug output / no output except errors
//! - `--config <PATH>` - configuration file to use instead of `depstage.toml`
//! - `--project <PATH>` - project `pom.xml` or the directory holding it
//! - `-D key=value` - override one `[stage]` key, repeatable
//!
//! # Example
//!
//! ```bash
//! # Stage with the defaults of depstage.toml
//! depstage stage
//!
//! # Preview a run that also copies zips, as JSON
//! depstage -D copyTypes=jar,zip plan --format json
//!
//! # Validate exclusions and patterns without touching the repository
//! depstage --project server/pom.xml check
//! ```

mod check;
pub mod common;
mod plan;
mod stage;


use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use common::CommandExecutor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global options.
///
/// Kept apart from [`Cli`] so commands can be executed with injected
/// settings in tests.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter, `None` when logging is off.
    pub log_level: Option<String>,

    /// Configuration file given with `--config`.
    pub config_path: Option<PathBuf>,

    /// Project given with `--project`.
    pub project: Option<PathBuf>,

    /// `key=value` overrides, in command-line order.
    pub properties: Vec<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Parser)]
#[command(
    name = "depstage",
    about = "Stage the dependencies of a Maven project and its feature sets",
    version,
    long_about = "depstage resolves the dependencies of a project's feature sets, copies \
                  library artifacts into a stage directory and unpacks archive artifacts there."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Project pom.xml, or the directory containing it
    #[arg(short, long, global = true, value_name = "POM")]
    project: Option<PathBuf>,

    /// Override a [stage] setting, e.g. -D copyTypes=jar,war
    #[arg(short = 'D', value_name = "KEY=VALUE", action = ArgAction::Append, global = true)]
    properties: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and stage the dependencies
    Stage(stage::StageCommand),

    /// Print the staging action of every resolved dependency
    Plan(plan::PlanCommand),

    /// Validate the configuration
    Check(check::CheckCommand),
}

impl Cli {
    /// Runs the selected command with settings from the global options.
    ///
    /// # Errors
    ///
    /// Whatever the command fails with.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            project: self.project.clone(),
            properties: self.properties.clone(),
        }
    }

    /// Runs the selected command with injected settings.
    ///
    /// # Errors
    ///
    /// Whatever the command fails with.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Stage(cmd) => cmd.execute(config).await,
            Commands::Plan(cmd) => cmd.execute(config).await,
            Commands::Check(cmd) => cmd.execute(config).await,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is used and `None` turns
/// logging off. Log lines go to stderr so command output on stdout stays
/// parseable.
pub fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("off")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
