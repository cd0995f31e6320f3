//! `proctor-runtime` binary.
//!
//! ```text
//! proctor-runtime --config proctor.toml
//! proctor-runtime --config proctor.toml --check
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use proctor_runtime::{ProctorConfig, ProctorRuntime};

#[derive(Debug, Parser)]
#[command(name = "proctor-runtime", version, about = "Exam proctoring server")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "PROCTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ProctorConfig::load(args.config.as_deref()).context("invalid configuration")?;
    if args.check {
        println!(
            "configuration OK: {} exam(s), {} roster entr(ies)",
            config.exams.len(),
            config.students.roster.len()
        );
        return Ok(());
    }

    let _telemetry = proctor_telemetry::init_telemetry(&config.telemetry)
        .context("failed to initialize telemetry")?;

    info!(
        service = %config.telemetry.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting exam proctor"
    );
    if config.admin.api_key.is_none() {
        warn!("No admin api_key configured; admin endpoints are disabled");
    }

    let runtime = ProctorRuntime::new(config)?;
    let handles = runtime.start().await?;
    info!(addr = %handles.local_addr, "Ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    runtime.shutdown();
    let _ = handles.server.await;
    let timed_out = handles.sweeper.await.unwrap_or_default();
    info!(timed_out, "Shutdown complete");
    Ok(())
}
