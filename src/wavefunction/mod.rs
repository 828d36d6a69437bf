//! Wavefunction module - trial wavefunction traits for VMC.

mod traits;

pub use traits::{Coordinates, TrialWfn};
