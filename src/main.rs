//! linkchecker main entry point
//!
//! This is the command-line interface for the linkchecker hyperlink checker.

use anyhow::Context;
use clap::Parser;
use linkchecker::checker::{check_source, LinkSource};
use linkchecker::config::{resolve_config, ConfigOverrides, TlsFloor};
use linkchecker::output::StdoutSink;
use linkchecker::url::IgnoreSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// linkchecker: a polite hyperlink checker
///
/// Extracts every link from an HTML page (a URL or a local file) and checks
/// that each one is reachable. Requests to the same host are made one at a
/// time with a pause in between; different hosts are checked in parallel.
#[derive(Parser, Debug)]
#[command(name = "linkchecker")]
#[command(version)]
#[command(about = "A polite hyperlink checker", long_about = None)]
struct Cli {
    /// URL of the page to check, or path to a local HTML file
    #[arg(short = 'u', long = "url", value_name = "TARGET")]
    target: String,

    /// Skip links written without a scheme (relative links)
    #[arg(long)]
    no_internal: bool,

    /// File listing hosts whose links are not checked, one per line
    #[arg(long, value_name = "FILE")]
    ignore: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Pause between two requests to the same host, in seconds
    #[arg(long, value_name = "SECS")]
    wait: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Minimum TLS version to accept (1.0, 1.1, 1.2 or 1.3)
    #[arg(long, value_name = "VERSION")]
    min_tls: Option<TlsFloor>,

    /// Maximum number of hosts checked at the same time
    #[arg(long, value_name = "N")]
    max_hosts: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            timeout_secs: self.timeout,
            wait_secs: self.wait,
            user_agent: self.user_agent.clone(),
            exclude_internal: self.no_internal,
            ignore_file: self.ignore.clone(),
            min_tls: self.min_tls,
            max_concurrent_hosts: self.max_hosts,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    exit_code(run(cli).await)
}

/// Logs a fatal error once and maps the run result to the process exit code
fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;

    let ignore = match &config.ignore_file {
        Some(path) => {
            let ignore = IgnoreSet::load(path)?;
            tracing::info!("Ignoring {} host(s) from {}", ignore.len(), path.display());
            ignore
        }
        None => IgnoreSet::new(),
    };

    let source = LinkSource::from_arg(&cli.target);
    tracing::debug!("Input: {:?}", source);

    let summary = check_source(&source, &ignore, &config, Arc::new(StdoutSink::new())).await?;
    summary.log();

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout carries only result lines.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkchecker=info,warn"),
            1 => EnvFilter::new("linkchecker=debug,info"),
            2 => EnvFilter::new("linkchecker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
