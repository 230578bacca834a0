//! eitmeta - Program metadata extractor for broadcast recordings
//!
//! Usage: eitmeta [--config <file>] [--command <cmdline>] <recording>...

use anyhow::Result;
use aribeit_cli::output::{print_json_report, FileReport};
use aribeit_core::{log_failure, AribEitConfig, MetadataProvider};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "eitmeta")]
#[command(about = "Extract EIT program metadata from transport-stream recordings", long_about = None)]
struct Args {
    /// Recordings to inspect (.ts, .m2ts, .m2t, .mts)
    #[arg(required = true)]
    recordings: Vec<PathBuf>,

    /// TOML configuration file with an [analyzer] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analyzer command line, overriding the configuration file
    #[arg(long)]
    command: Option<String>,

    /// Analyzer timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    // Default: errors only (clean JSON on stdout)
    // Verbose: show Info level logs for debugging
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    let provider = MetadataProvider::new(load_config(&args)?.analyzer);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, cancelling analyzer");
            interrupt.cancel();
        }
    });

    run_eitmeta(&provider, &args.recordings, args.pretty, &cancel).await;

    Ok(())
}

fn load_config(args: &Args) -> Result<AribEitConfig> {
    let mut config = match &args.config {
        Some(path) => AribEitConfig::load(path)?,
        None => AribEitConfig::default(),
    };

    if let Some(command) = &args.command {
        config.analyzer.command = command.clone();
    }
    if let Some(timeout) = args.timeout {
        config.analyzer.timeout_secs = Some(timeout);
    }

    config.analyzer.validate()?;

    if !config.analyzer.is_configured() {
        log::warn!("No analyzer command configured; no metadata will be produced");
    }

    Ok(config)
}

/// Process recordings one at a time, printing a JSON line per file
async fn run_eitmeta(
    provider: &MetadataProvider,
    recordings: &[PathBuf],
    pretty: bool,
    cancel: &CancellationToken,
) {
    for path in recordings {
        let report = match provider.extract(path, cancel).await {
            Ok(metadata) => FileReport::success(path, metadata),
            Err(e) => {
                log_failure(path, &e);
                FileReport::no_metadata(path, &e)
            }
        };
        print_json_report(&report, pretty);

        if cancel.is_cancelled() {
            log::info!("Stopping after cancellation");
            break;
        }
    }
}
