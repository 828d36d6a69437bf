//! One-dimensional harmonic oscillator in dimensionless units (ℏ = m = ω = 1).
//!
//! Trial wavefunction Ψ(x; α) = exp(-½α²x²). The exact ground state is α = 1
//! with E₀ = ½.

use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::sampling::EnergyCalculator;
use crate::wavefunction::TrialWfn;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HarmonicOscillator {
    /// Width of the initial position draw in units of the walk step
    #[serde(default = "default_init_spread")]
    pub init_spread: f64,
}

fn default_init_spread() -> f64 {
    1.0
}

impl Default for HarmonicOscillator {
    fn default() -> Self {
        Self {
            init_spread: default_init_spread(),
        }
    }
}

impl HarmonicOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed-form local energy ½x²(1 - α⁴) + ½α².
    pub fn analytic_local_energy(x: f64, alpha: f64) -> f64 {
        0.5 * x * x * (1.0 - alpha.powi(4)) + 0.5 * alpha * alpha
    }
}

impl TrialWfn for HarmonicOscillator {
    type Walker = f64;

    fn num_params(&self) -> usize {
        1
    }

    fn initialize<R: Rng + ?Sized>(&self, step: f64, rng: &mut R) -> f64 {
        self.init_spread * step * (rng.gen::<f64>() - 0.5)
    }

    fn evaluate(&self, x: &f64, params: &[f64]) -> f64 {
        let alpha = params[0];
        (-0.5 * alpha * alpha * x * x).exp()
    }

    fn laplacian(&self, x: &f64, params: &[f64]) -> f64 {
        let a2 = params[0] * params[0];
        (a2 * a2 * x * x - a2) * self.evaluate(x, params)
    }
}

impl EnergyCalculator for HarmonicOscillator {
    fn potential(&self, x: &f64) -> f64 {
        0.5 * x * x
    }

    // E_L = V(1 - α⁴) + ½α² with V = ½x², so the cached potential is enough.
    fn local_energy(&self, _x: &f64, params: &[f64], _psi: f64, potential: f64) -> f64 {
        let a2 = params[0] * params[0];
        potential * (1.0 - a2 * a2) + 0.5 * a2
    }
}
