//! `perimeter-demo`: runs the simulation in real time for a while, then
//! exports the log.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use perimeter_app::config::AppConfig;
use perimeter_app::game_loop::spawn_game_loop;
use perimeter_app::sink::TracingSink;
use perimeter_app::state::{latest, shared_snapshot};
use perimeter_core::commands::OperatorCommand;
use perimeter_sim::export::ExportFormat;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

/// Headless perimeter-security simulation
#[derive(Parser, Debug)]
#[command(name = "perimeter-demo")]
#[command(version)]
#[command(about = "Run the perimeter simulation and export its log")]
struct Args {
    /// Configuration file path (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds to run
    #[arg(short = 'd', long)]
    duration: Option<u64>,

    /// Simulation speed multiplier
    #[arg(long)]
    time_scale: Option<f64>,

    /// Export format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Export file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_or_create(path)?,
        None => AppConfig::default(),
    };

    // Override with command line args
    if let Some(seed) = args.seed {
        config.sim.seed = seed;
    }
    if let Some(duration) = args.duration {
        config.run_secs = duration;
    }
    if let Some(scale) = args.time_scale {
        config.sim.time_scale = scale;
    }
    if let Some(format) = args.format {
        config.export.format = format.into();
    }
    if let Some(output) = args.output {
        config.export.path = Some(output);
    }
    if args.debug {
        config.log_level = "debug".to_string();
    }

    // Logs go to stderr so an stdout export stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("PERIMETER v{}", env!("CARGO_PKG_VERSION"));

    let shared = shared_snapshot();
    let handle = spawn_game_loop(config.sim.clone(), Box::new(TracingSink), shared.clone())
        .context("spawning loop thread")?;

    handle.send(OperatorCommand::Start);
    for command in config.commands.iter().cloned() {
        handle.send(command);
    }

    info!(secs = config.run_secs, "running");
    std::thread::sleep(std::time::Duration::from_secs(config.run_secs));

    if let Some(snapshot) = latest(&shared) {
        info!(
            tick = snapshot.time.tick,
            entities = snapshot.entities.len(),
            alarm = snapshot.alarm_active,
            "final state"
        );
        for warning in &snapshot.warnings {
            info!("{warning}");
        }
    }

    let engine = handle.shutdown().context("loop thread panicked")?;
    let bytes = engine.export_logs(config.export.format)?;

    match &config.export.path {
        Some(path) => {
            std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            info!("Exported {} bytes to {:?}", bytes.len(), path);
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&bytes)?;
        }
    }

    Ok(())
}
