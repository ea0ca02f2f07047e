use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use inkfield::{Portfolio, SiteConfig};

#[derive(Parser)]
#[command(name = "inkfield")]
#[command(about = "Particle text portfolio", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON site configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON portfolio content
    #[arg(long)]
    content: Option<PathBuf>,

    /// Extra font file to register (overrides the config)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seed for the particle jitter (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Render headless and write a PNG here instead of opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frames to step before writing the snapshot
    #[arg(long, default_value_t = 120)]
    frames: u32,
}

fn run(cli: Cli) -> inkfield::Result<()> {
    let mut config = match &cli.config {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };
    if cli.font.is_some() {
        config.font_path = cli.font;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let portfolio = match &cli.content {
        Some(path) => Portfolio::load(path)?,
        None => Portfolio::default(),
    };

    match cli.snapshot {
        Some(path) => inkfield::render_snapshot(&config, &portfolio, cli.frames, path),
        None => inkfield::run(config, portfolio),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("inkfield starting");
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
