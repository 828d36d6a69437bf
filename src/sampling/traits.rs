//! Traits for correlated-sampling energy estimation.

use crate::wavefunction::TrialWfn;

/// Local energy of a physical system under a parametrised trial wavefunction.
///
/// The potential only depends on the configuration, so it is computed once per
/// configuration and cached alongside the reference wavefunction value.
pub trait EnergyCalculator: TrialWfn {
    /// Potential energy V(R).
    fn potential(&self, r: &Self::Walker) -> f64;

    /// Local energy E_L = V + (TΨ)/Ψ, given the already evaluated Ψ(R; params)
    /// and the cached V(R).
    fn local_energy(&self, r: &Self::Walker, params: &[f64], psi: f64, potential: f64) -> f64;
}
