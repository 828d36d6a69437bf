//! IO module - run configuration, data files, figures and run reports.

mod config;
mod datafile;
mod plot;
mod report;

pub use config::{read_harmonic_config, read_helium_config, HarmonicConfig, HeliumConfig};
pub use datafile::{read_data_file, read_records, write_data_file, write_records, DataRow};
pub use plot::{plot_harmonic, plot_helium};
pub use report::{summarize, write_harmonic_report, write_helium_report, ReportPaths};
