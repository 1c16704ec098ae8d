//! Resolve the project's dependencies and stage them.

use crate::archive::ArchiveExtractor;
use crate::cli::common::{CommandContext, CommandExecutor};
use crate::stager::Stager;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

/// Command to stage the project's dependencies.
///
/// Copy failures do not fail the command; they are listed after the run.
#[derive(Args, Debug, Default)]
pub struct StageCommand {
    /// Skip staging regardless of the configuration
    #[arg(long)]
    pub skip: bool,
}

impl CommandExecutor for StageCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let mut settings = context.settings()?;
        settings.skip |= self.skip;
        if settings.skip {
            info!("Skipping dependency staging");
            return Ok(());
        }

        let repository = context.repository();
        let (_, resolved) = context.resolve(&repository).await?;

        let archiver = ArchiveExtractor;
        let report = Stager::new(&settings, &archiver).stage(&resolved).await?;

        if !report.failed.is_empty() {
            eprintln!(
                "{} {} dependency file(s) could not be copied:",
                "⚠".yellow(),
                report.failed.len()
            );
            for failed in &report.failed {
                eprintln!("  {} {}: {}", "✗".red(), failed.artifact, failed.error);
            }
        }
        Ok(())
    }
}
