use std::path::PathBuf;

use clap::Parser;

use multicalc::{run_multicalc, MultiCalcConfig};

/// Interactive 2D/3D function explorer.
#[derive(Parser, Debug)]
#[command(name = "multicalc", version, about)]
struct Cli {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Function shown at startup, e.g. "sin(x) * cos(y)".
    #[arg(long)]
    function: Option<String>,

    /// Directory for the history file.
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Keep history in memory only.
    #[arg(long)]
    memory_only: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => MultiCalcConfig::load_from_file(path)?,
        None => MultiCalcConfig::default(),
    };
    if let Some(f) = cli.function {
        cfg.default_function = f;
    }
    if let Some(dir) = cli.storage_dir {
        cfg.history.storage_dir = Some(dir);
    }
    if cli.memory_only {
        cfg.history.memory_only = true;
    }

    run_multicalc(cfg)?;
    Ok(())
}
