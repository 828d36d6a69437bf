//! Systems module - physical systems for VMC calculations.

mod harmonic;
mod helium;
mod potential;

pub use harmonic::HarmonicOscillator;
pub use helium::{Helium4, KineticMethod, HBAR_C, NUCLEON_MASS};
pub use potential::{GaussianTerm, PairPotential};
