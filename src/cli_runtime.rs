use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use nodedash::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DashboardConfig};
use nodedash::logging::{self, LogTarget};

use crate::Commands;

#[derive(Parser)]
#[command(name = "nodedash")]
#[command(about = "Train and run models on remote nodes", long_about = None)]
pub(crate) struct Cli {
    /// Broker base address
    #[arg(long, env = "NODEDASH_URL", default_value = DEFAULT_BASE_URL, global = true)]
    url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Append diagnostic logs to this file
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::new(&cli.url, Duration::from_secs(cli.timeout_secs))?;

    match cli.command {
        None => {
            let target = cli.log_file.map(LogTarget::File).unwrap_or(LogTarget::Discard);
            logging::init(target, "info")?;
            nodedash::tui::run(config)?;
        }
        Some(command) => {
            let target = cli.log_file.map(LogTarget::File).unwrap_or(LogTarget::Stderr);
            logging::init(target, "warn")?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("build tokio runtime")?;
            runtime.block_on(crate::cli_exec::handle_command(&config, command))?;
        }
    }

    Ok(())
}
