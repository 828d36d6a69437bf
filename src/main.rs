use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_vmc::io::{
    read_harmonic_config, read_helium_config, summarize, write_harmonic_report, write_helium_report,
    HarmonicConfig, HeliumConfig,
};
use rust_vmc::CorrelatedVmc;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    system: System,
}

#[derive(Subcommand, Debug)]
enum System {
    /// 1-D harmonic oscillator with Ψ = exp(-α²x²/2)
    Harmonic {
        /// YAML run configuration; built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "HOResults")]
        output: PathBuf,
    },
    /// ⁴He nucleus with a pair-product trial wavefunction
    Helium {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = "4HEResults")]
        output: PathBuf,
    },
}

fn run_harmonic(config: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let config = match config {
        Some(path) => read_harmonic_config(&path).with_context(|| format!("reading {}", path.display()))?,
        None => HarmonicConfig::default(),
    };

    info!("harmonic oscillator: {} moves, {} search iterations", config.vmc.n_moves, config.vmc.n_search);
    let vmc = CorrelatedVmc::new(config.system, config.vmc)?;
    let run = vmc.run()?;

    info!("walk acceptance ratio {:.4}, ensemble of {}", run.acceptance_ratio, run.ensemble_size);
    summarize(&["alpha"], &run);
    write_harmonic_report(&output, &run)?;
    Ok(())
}

fn run_helium(config: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let config = match config {
        Some(path) => read_helium_config(&path).with_context(|| format!("reading {}", path.display()))?,
        None => HeliumConfig::default(),
    };

    info!(
        "helium-4: {} nucleons, {} moves, {} search iterations",
        config.system.num_nucleons, config.vmc.n_moves, config.vmc.n_search
    );
    let vmc = CorrelatedVmc::new(config.system, config.vmc)?;
    let run = vmc.run()?;

    info!("walk acceptance ratio {:.4}, ensemble of {}", run.acceptance_ratio, run.ensemble_size);
    summarize(&["gamma", "a", "beta"], &run);
    write_helium_report(&output, &run)?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match args.system {
        System::Harmonic { config, output } => run_harmonic(config, output),
        System::Helium { config, output } => run_helium(config, output),
    }
}
