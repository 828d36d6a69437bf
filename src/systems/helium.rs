//! ⁴He as a cluster of A nucleons bound by a central pair potential.
//!
//! Trial wavefunction Ψ(R; γ, a, β) = Πᵢ<ⱼ [exp(-γ dᵢⱼ) + a exp(-β dᵢⱼ)].
//! Lengths in fm, energies in MeV.

use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::correlation::PairCorrelation;
use crate::sampling::EnergyCalculator;
use crate::systems::PairPotential;
use crate::wavefunction::TrialWfn;

/// ħc in MeV·fm
pub const HBAR_C: f64 = 197.3269804;
/// Nucleon (neutron) rest mass in MeV
pub const NUCLEON_MASS: f64 = 939.56542052;

/// How ∇²Ψ enters the kinetic term.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum KineticMethod {
    /// Central second difference of Ψ along every coordinate with step `h`
    FiniteDifference { h: f64 },
    /// Closed-form Laplacian of the pair product
    Analytic,
}

impl Default for KineticMethod {
    fn default() -> Self {
        KineticMethod::FiniteDifference { h: 1e-5 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Helium4 {
    /// Number of nucleons A
    pub num_nucleons: usize,
    /// Width of the initial configuration draw in units of the walk step
    pub init_spread: f64,
    pub hbar_c: f64,
    pub nucleon_mass: f64,
    pub kinetic: KineticMethod,
    pub potential: PairPotential,
}

impl Default for Helium4 {
    fn default() -> Self {
        Self {
            num_nucleons: 4,
            init_spread: 10.0,
            hbar_c: HBAR_C,
            nucleon_mass: NUCLEON_MASS,
            kinetic: KineticMethod::default(),
            potential: PairPotential::default(),
        }
    }
}

impl Helium4 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kinetic(mut self, kinetic: KineticMethod) -> Self {
        self.kinetic = kinetic;
        self
    }

    /// Kinetic prefactor C = (ħc)² / 2m, about 20.72 MeV·fm².
    pub fn kinetic_constant(&self) -> f64 {
        self.hbar_c * self.hbar_c / (2.0 * self.nucleon_mass)
    }

    /// C ∇²Ψ with the configured differentiation method.
    pub fn kinetic_term(&self, r: &Vec<Vector3<f64>>, params: &[f64]) -> f64 {
        let laplacian = match self.kinetic {
            KineticMethod::FiniteDifference { h } => self.numerical_laplacian(r, params, h),
            KineticMethod::Analytic => self.laplacian(r, params),
        };
        self.kinetic_constant() * laplacian
    }
}

impl TrialWfn for Helium4 {
    type Walker = Vec<Vector3<f64>>;

    fn num_params(&self) -> usize {
        3
    }

    fn initialize<R: Rng + ?Sized>(&self, step: f64, rng: &mut R) -> Vec<Vector3<f64>> {
        let width = self.init_spread * step;
        (0..self.num_nucleons)
            .map(|_| {
                Vector3::new(
                    width * (rng.gen::<f64>() - 0.5),
                    width * (rng.gen::<f64>() - 0.5),
                    width * (rng.gen::<f64>() - 0.5),
                )
            })
            .collect()
    }

    fn evaluate(&self, r: &Vec<Vector3<f64>>, params: &[f64]) -> f64 {
        PairCorrelation::from_params(params).product(r)
    }

    fn laplacian(&self, r: &Vec<Vector3<f64>>, params: &[f64]) -> f64 {
        PairCorrelation::from_params(params).product_laplacian(r)
    }
}

impl EnergyCalculator for Helium4 {
    fn potential(&self, r: &Vec<Vector3<f64>>) -> f64 {
        self.potential.total(r)
    }

    fn local_energy(&self, r: &Vec<Vector3<f64>>, params: &[f64], psi: f64, potential: f64) -> f64 {
        potential - self.kinetic_term(r, params) / psi
    }
}
