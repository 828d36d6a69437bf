//! Output artifacts of a finished run: `<root>/Data/*.dat` and
//! `<root>/Figures/*.svg`, plus the console summary.

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::info;
use crate::sampling::{SearchRecord, VmcRun};
use super::datafile::write_data_file;
use super::plot::{plot_harmonic, plot_helium};

/// Energy color scale of the ⁴He scatter plot, MeV.
const HELIUM_ENERGY_SCALE: (f64, f64) = (-27.0, 0.0);

/// Paths written for one run.
#[derive(Clone, Debug)]
pub struct ReportPaths {
    pub data: PathBuf,
    pub figure: PathBuf,
}

fn prepare_dirs(root: &Path) -> Result<(PathBuf, PathBuf)> {
    let data_dir = root.join("Data");
    let figure_dir = root.join("Figures");
    fs::create_dir_all(&data_dir).with_context(|| format!("creating {}", data_dir.display()))?;
    fs::create_dir_all(&figure_dir).with_context(|| format!("creating {}", figure_dir.display()))?;
    Ok((data_dir, figure_dir))
}

fn format_params(names: &[&str], record: &SearchRecord) -> String {
    names
        .iter()
        .zip(&record.params)
        .map(|(name, value)| format!("{} = {:.6}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Log the last accepted and the minimum-energy parameter sets.
pub fn summarize(names: &[&str], run: &VmcRun) {
    let last = run.last();
    let min = run.minimum();
    info!(
        "last values: {}, energy = {:.6}, variance = {:.6}",
        format_params(names, last),
        last.energy,
        last.sigma()
    );
    info!(
        "minimum values: {}, energy = {:.6}, variance = {:.6} (iteration {})",
        format_params(names, min),
        min.energy,
        min.sigma(),
        min.iteration
    );
}

pub fn write_harmonic_report(root: &Path, run: &VmcRun) -> Result<ReportPaths> {
    let (data_dir, figure_dir) = prepare_dirs(root)?;
    let data = data_dir.join("DataHO.dat");
    let figure = figure_dir.join("VMCHarmonic.svg");

    write_data_file(&data, &["alpha"], run.records()).with_context(|| format!("writing {}", data.display()))?;
    plot_harmonic(&figure, run.records()).with_context(|| format!("plotting {}", figure.display()))?;
    info!("wrote {} and {}", data.display(), figure.display());
    Ok(ReportPaths { data, figure })
}

pub fn write_helium_report(root: &Path, run: &VmcRun) -> Result<ReportPaths> {
    let (data_dir, figure_dir) = prepare_dirs(root)?;
    let data = data_dir.join("Data4HE.dat");
    let figure = figure_dir.join("VMC4HE.svg");

    write_data_file(&data, &["gamma", "a", "beta"], run.records())
        .with_context(|| format!("writing {}", data.display()))?;
    let (e_min, e_max) = HELIUM_ENERGY_SCALE;
    plot_helium(&figure, run.records(), e_min, e_max).with_context(|| format!("plotting {}", figure.display()))?;
    info!("wrote {} and {}", data.display(), figure.display());
    Ok(ReportPaths { data, figure })
}
