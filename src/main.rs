//! depstage - stage the dependencies of Maven feature sets.
//!
//! Entry point: parses the command line, installs logging, runs the command
//! and renders any error with suggestions before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use depstage::cli;
use depstage::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let config = cli.build_config();
    cli::init_logging(config.log_level.as_deref());

    match cli.execute_with_config(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
