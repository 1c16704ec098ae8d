//! Print what `stage` would do without writing anything.

use crate::archive::ArchiveExtractor;
use crate::cli::common::{CommandContext, CommandExecutor};
use crate::coordinate::ArtifactCoordinate;
use crate::stager::{PlannedAction, Stager, StagingAction};
use crate::utils::relative_display;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Output format for the plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per dependency
    #[default]
    Text,
    /// A JSON document for tooling
    Json,
}

/// Command to print the staging plan.
#[derive(Args, Debug, Default)]
pub struct PlanCommand {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanOutput<'a> {
    project: &'a ArtifactCoordinate,
    stage_directory: &'a Path,
    skip: bool,
    actions: &'a [PlannedAction],
}

impl CommandExecutor for PlanCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let settings = context.settings()?;
        let repository = context.repository();
        let (project, resolved) = context.resolve(&repository).await?;

        let archiver = ArchiveExtractor;
        let actions = Stager::new(&settings, &archiver).plan(&resolved);

        match self.format {
            OutputFormat::Json => {
                let output = PlanOutput {
                    project: &project.coordinate,
                    stage_directory: &settings.stage_dir,
                    skip: settings.skip,
                    actions: &actions,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!(
                    "Staging plan for {} into {}",
                    project.coordinate.to_string().bold(),
                    relative_display(&settings.stage_dir, &context.project_dir)
                );
                if settings.skip {
                    println!("{} staging is disabled (skip = true)", "⚠".yellow());
                }
                if actions.is_empty() {
                    println!("  No dependencies to stage");
                }
                for planned in &actions {
                    println!("  {}", describe(planned, &context.project_dir));
                }
            }
        }
        Ok(())
    }
}

fn describe(planned: &PlannedAction, base_dir: &Path) -> String {
    let artifact = format!("{} [{}]", planned.artifact, planned.scope);
    match &planned.action {
        StagingAction::Copy { destination, .. } => {
            format!("{} {} -> {}", "copy  ".green(), artifact, relative_display(destination, base_dir))
        }
        StagingAction::Unpack { destination, .. } => {
            format!("{} {} -> {}/", "unpack".cyan(), artifact, relative_display(destination, base_dir))
        }
        StagingAction::Skip { reason } => format!("{} {} ({})", "skip  ".dimmed(), artifact, reason),
    }
}
