//! CLI argument parsing and command dispatch

use anyhow::{Context, Result};
use clap::Parser;
use mtls_load_core::{
    HttpsTargetClient, LoadConfig, OrchestratorBuilder, StdoutReporter, StopCondition, TlsPaths,
    DEFAULT_REPORT_INTERVAL, DEFAULT_TARGET, DEFAULT_WORKERS,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Long options that may also be spelled with a single dash (`-cert ca.pem`)
const LONG_OPTIONS: &[&str] = &[
    "cert",
    "key",
    "CA",
    "ca",
    "target",
    "workers",
    "report-interval",
    "duration-seconds",
    "total-requests",
    "rate-limit",
    "verbose",
];

/// Fixed-concurrency HTTPS load generator over mutual TLS
#[derive(Parser, Debug)]
#[command(name = "mtls-load")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// A PEM encoded certificate file
    #[arg(long, default_value = "ca.pem")]
    pub cert: PathBuf,

    /// A PEM encoded private key file
    #[arg(long, default_value = "ca-key.pem")]
    pub key: PathBuf,

    /// A PEM encoded CA's certificate file
    #[arg(long = "CA", visible_alias = "ca", default_value = "ca.pem")]
    pub ca: PathBuf,

    /// URL to send GET requests to
    #[arg(short, long, env = "MTLS_LOAD_TARGET", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Print throughput every N requests
    #[arg(long, default_value_t = DEFAULT_REPORT_INTERVAL)]
    pub report_interval: u64,

    /// Stop after this many seconds (default: run until killed)
    #[arg(long, conflicts_with = "total_requests")]
    pub duration_seconds: Option<u64>,

    /// Stop after this many requests in total (default: run until killed)
    #[arg(long, conflicts_with = "duration_seconds")]
    pub total_requests: Option<u64>,

    /// Cap the request rate across all workers (requests per second)
    #[arg(long)]
    pub rate_limit: Option<f64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse arguments, accepting single-dash long options
    pub fn parse_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    /// Credential file paths
    pub fn tls_paths(&self) -> TlsPaths {
        TlsPaths {
            cert: self.cert.clone(),
            key: self.key.clone(),
            ca: self.ca.clone(),
        }
    }

    /// Run configuration derived from the flags
    pub fn load_config(&self) -> LoadConfig {
        let stop_condition = match (self.duration_seconds, self.total_requests) {
            (Some(secs), _) => StopCondition::Duration(Duration::from_secs(secs)),
            (None, Some(total)) => StopCondition::RequestCount(total),
            (None, None) => StopCondition::Indefinite,
        };

        LoadConfig {
            workers: self.workers,
            target: self.target.clone(),
            report_interval: self.report_interval,
            stop_condition,
            rate_limit: self.rate_limit,
        }
    }

    /// Load credentials, then run the workers
    ///
    /// Credential failures abort before any request is sent.
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config();
        config.validate().context("invalid configuration")?;

        let paths = self.tls_paths();
        let client = HttpsTargetClient::from_paths(&paths, config.target.clone(), config.workers)
            .context("failed to set up mutual TLS client")?;

        tracing::info!(
            cert = %paths.cert.display(),
            key = %paths.key.display(),
            ca = %paths.ca.display(),
            "Loaded client credentials"
        );

        let orchestrator = OrchestratorBuilder::new()
            .config(config)
            .client(Arc::new(client))
            .reporter(Arc::new(StdoutReporter))
            .build()?;

        orchestrator.run_with_signal_handling().await?;

        Ok(())
    }
}

/// Rewrite `-name` / `-name=value` to `--name` for known long options
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text.starts_with("--") {
                return arg;
            }
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_OPTIONS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
