//! Sampling module - configuration walk, ensemble cache, correlated-sampling
//! estimator and parameter search.

mod traits;
mod metropolis;
mod ensemble;
mod estimator;
mod search;
mod vmc;

pub use traits::EnergyCalculator;
pub use metropolis::{sample_chain, Chain};
pub use ensemble::Ensemble;
pub use estimator::{estimate, Estimate};
pub use search::{accept_move, ParameterSearch, RunningMinimum, SearchOutcome, SearchRecord};
pub use vmc::{CorrelatedVmc, VmcParams, VmcRun};
