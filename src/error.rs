//! Error type shared by the sampler, estimator, search and reporting layers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VmcError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
    #[error("no configuration in the ensemble has a usable reference wavefunction value")]
    EmptyEnsemble,
    #[error("parameter proposal left the allowed domain {retries} times in a row")]
    DomainRetriesExhausted { retries: usize },
    #[error("parameter search produced no finite energy estimate")]
    NoFiniteEstimate,
    #[error("malformed data file at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, VmcError>;
