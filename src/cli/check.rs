//! Validate the configuration without resolving anything.

use crate::cli::common::{CommandContext, CommandExecutor};
use crate::utils::relative_display;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Command to validate the configuration.
///
/// Exclusion entries, entry patterns and name mappings are parsed exactly as
/// a staging run would; the first invalid value fails the command.
#[derive(Args, Debug, Default)]
pub struct CheckCommand {}

impl CommandExecutor for CheckCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let settings = context.settings()?;
        let stage = &context.config.stage;
        let repository = &context.config.repository;

        println!("{} Configuration is valid", "✓".green());
        println!("  Project: {}", context.pom_path.display());
        println!("  Stage directory: {}", relative_display(&settings.stage_dir, &context.project_dir));
        println!("  Copy types: {} ({} excluded)", settings.copy_types.join(","), settings.copy_excludes.len());
        println!(
            "  Unpack types: {} ({} excluded)",
            settings.unpack_types.join(","),
            settings.unpack_excludes.len()
        );
        println!("  Unpacked entries: {}", settings.selector);
        println!("  Scopes: include '{}', exclude '{}'", stage.include_scope, stage.exclude_scope);
        if stage.featureset_groupids.is_empty() {
            println!("  {} No feature set groupIds configured", "⚠".yellow());
        } else {
            println!("  Feature set groups: {}", stage.featureset_groupids.join(", "));
        }
        println!(
            "  Local repository: {}{}",
            context.config.local_repository().display(),
            if repository.offline { " (offline)" } else { "" }
        );
        if settings.skip {
            println!("  {} Staging is disabled (skip = true)", "⚠".yellow());
        }
        Ok(())
    }
}
