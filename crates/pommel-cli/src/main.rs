use clap::Parser;
use tracing::error;

use pommel_cli::cli::Cli;
use pommel_cli::commands;
use pommel_core::error::{ConfigError, PommelError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match commands::dispatch(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!(error = %err, "run aborted");
            std::process::exit(exit_code_for(&err));
        }
    }
}

/// Configuration problems exit 2, the same bucket as clap usage errors;
/// everything else exits 1.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some()
        || matches!(err.downcast_ref::<PommelError>(), Some(PommelError::Config(_)))
    {
        2
    } else {
        1
    }
}
