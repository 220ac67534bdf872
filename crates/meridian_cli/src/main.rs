//! Meridian CLI
//!
//! Replay viewport transition scenarios and inspect the emitted frames.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod replay;
mod scenario;

use replay::LifecycleKind;
use scenario::Scenario;

#[derive(Parser)]
#[command(name = "meridian")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Meridian viewport transition CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and print every emitted view state
    Replay {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate a scenario file without replaying it
    Check {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Replay { scenario, format } => cmd_replay(&scenario, format),
        Commands::Check { scenario } => cmd_check(&scenario),
    }
}

fn cmd_replay(path: &Path, format: OutputFormat) -> Result<()> {
    let scenario = Scenario::load(path)?;
    info!(
        "Replaying {} ({} requests, {}ms frames)",
        path.display(),
        scenario.requests.len(),
        scenario.frame_ms
    );

    let report = replay::replay(&scenario)?;

    for frame in &report.frames {
        match format {
            OutputFormat::Text => println!(
                "frame {:>5}  t={:>9.1}ms  {:?}",
                frame.frame, frame.timestamp, frame.view_state
            ),
            OutputFormat::Json => println!("{}", serde_json::to_string(frame)?),
        }
    }

    for event in &report.lifecycle {
        debug!("{:?} {}", event.kind, event.transition);
    }
    info!(
        "{} frames, {} started, {} interrupted, {} ended",
        report.frames.len(),
        report.count(LifecycleKind::Start),
        report.count(LifecycleKind::Interrupt),
        report.count(LifecycleKind::End)
    );
    info!("Final view state: {:?}", report.final_state);

    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    info!(
        "{} is valid: {} requests, last at frame {}",
        path.display(),
        scenario.requests.len(),
        scenario.last_request_frame()
    );
    Ok(())
}
