// Run configuration files, in YAML.
//
// Every field falls back to the reference run, so a file only needs the
// values it changes:
//
// vmc:
//   seed: 12231
//   n_moves: 10000
//   n_search: 135
// system:
//   kinetic:
//     method: analytic

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::sampling::VmcParams;
use crate::systems::{HarmonicOscillator, Helium4};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HarmonicConfig {
    #[serde(default = "VmcParams::harmonic")]
    pub vmc: VmcParams,
    #[serde(default)]
    pub system: HarmonicOscillator,
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self {
            vmc: VmcParams::harmonic(),
            system: HarmonicOscillator::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HeliumConfig {
    #[serde(default = "VmcParams::helium")]
    pub vmc: VmcParams,
    #[serde(default)]
    pub system: Helium4,
}

impl Default for HeliumConfig {
    fn default() -> Self {
        Self {
            vmc: VmcParams::helium(),
            system: Helium4::default(),
        }
    }
}

/// Read a harmonic-oscillator run configuration from a YAML file.
pub fn read_harmonic_config<P: AsRef<Path>>(filename: P) -> Result<HarmonicConfig> {
    let file = std::fs::File::open(filename)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_yaml::from_reader(reader)?)
}

/// Read a ⁴He run configuration from a YAML file.
pub fn read_helium_config<P: AsRef<Path>>(filename: P) -> Result<HeliumConfig> {
    let file = std::fs::File::open(filename)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_yaml::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::KineticMethod;
    use std::io::Write;

    #[test]
    fn test_empty_mapping_gives_reference_runs() {
        let ho: HarmonicConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(ho.vmc, VmcParams::harmonic());
        let he: HeliumConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(he.vmc, VmcParams::helium());
        assert_eq!(he.system.num_nucleons, 4);
    }

    #[test]
    fn test_partial_system_section() {
        let yaml = "
system:
  kinetic:
    method: analytic
  init_spread: 4.0
";
        let he: HeliumConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(he.system.kinetic, KineticMethod::Analytic);
        assert_eq!(he.system.init_spread, 4.0);
        assert_eq!(he.system.potential.terms.len(), 5);
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let cfg = HeliumConfig::default();
        write!(file, "{}", serde_yaml::to_string(&cfg).unwrap()).unwrap();
        let back = read_helium_config(file.path()).unwrap();
        assert_eq!(back.vmc, cfg.vmc);
        assert_eq!(back.system.potential, cfg.system.potential);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_harmonic_config("/nonexistent/vmc.yml").unwrap_err();
        assert!(matches!(err, crate::error::VmcError::Io(_)));
    }
}
