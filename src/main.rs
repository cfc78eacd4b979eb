//! mtls-load - fixed-concurrency HTTPS load generator over mutual TLS

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse_args(std::env::args_os());

    // Stdout is reserved for throughput lines
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    cli.run().await
}
