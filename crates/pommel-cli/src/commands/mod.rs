//! Subcommand dispatch.

pub mod config;
pub mod list;
pub mod run;

use pommel_core::config::{Defaults, EnvVars};
use pommel_core::logging;

use crate::cli::{Cli, Commands};

/// Initializes logging, resolves the configuration, then hands off to the
/// subcommand. Returns the process exit code.
pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    // The daily log file only makes sense for a run; list/config stay on
    // stderr.
    let logs_dir = match cli.command {
        Commands::Run { .. } => Some(cli.output_dir.join("logs")),
        _ => None,
    };
    logging::init_logging(cli.verbose, logs_dir.as_deref());

    let resolved = pommel_core::config::resolve(
        &cli.overrides(),
        &EnvVars::from_process(),
        &Defaults::default(),
    )?;

    match cli.command {
        Commands::Run {
            ref tag,
            ref filter,
        } => run::execute(&cli, resolved, tag, filter.as_deref()).await,
        Commands::List => list::execute(),
        Commands::Config => config::execute(&resolved),
    }
}
