//! `doorlog` binary

use clap::Parser;
use doorlog_cli::{Cli, CliError, run};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    tracing::debug!(command = ?cli.command, "starting");

    let mut stdout = std::io::stdout().lock();
    run(cli.command, &mut stdout).await
}
