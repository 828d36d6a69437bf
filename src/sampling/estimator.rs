//! Correlated-sampling energy estimator.
//!
//! For trial parameters p the fixed ensemble drawn from |Ψ(p_ref)|² is
//! reweighted by wᵢ = (Ψ(Rᵢ; p) / Ψ(Rᵢ; p_ref))². With eᵢ = wᵢ E_L(Rᵢ; p):
//!
//!   E  = Σ eᵢ / Σ wᵢ
//!   σ² = (Σ eᵢ² / Σ wᵢ - E²) / Σ wᵢ

use rayon::prelude::*;
use crate::error::{Result, VmcError};
use super::ensemble::Ensemble;
use super::traits::EnergyCalculator;

/// Energy estimate for one parameter vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    pub energy: f64,
    /// Variance of the mean
    pub variance: f64,
}

impl Estimate {
    /// Display error bar sqrt(|σ²|).
    pub fn sigma(&self) -> f64 {
        self.variance.abs().sqrt()
    }
}

/// Running sums Σe, Σe², Σw.
#[derive(Clone, Copy, Debug, Default)]
struct Sums {
    e_loc: f64,
    e_loc_2: f64,
    weight: f64,
}

impl Sums {
    fn add(self, other: Sums) -> Sums {
        Sums {
            e_loc: self.e_loc + other.e_loc,
            e_loc_2: self.e_loc_2 + other.e_loc_2,
            weight: self.weight + other.weight,
        }
    }
}

/// Estimate E and σ² of the trial parameters `params` over `ensemble`.
pub fn estimate<T>(system: &T, ensemble: &Ensemble<T::Walker>, params: &[f64], parallel: bool) -> Result<Estimate>
where
    T: EnergyCalculator,
{
    let contribution = |i: usize| {
        let r = &ensemble.walkers()[i];
        let psi = system.evaluate(r, params);
        let ratio = psi / ensemble.psi_ref()[i];
        let weight = ratio * ratio;
        // Ψ underflowed: E_L = TΨ/Ψ is undefined but the configuration carries no weight
        let e = if weight == 0.0 {
            0.0
        } else {
            weight * system.local_energy(r, params, psi, ensemble.potential()[i])
        };
        Sums {
            e_loc: e,
            e_loc_2: e * e,
            weight,
        }
    };

    let sums = if parallel {
        (0..ensemble.len())
            .into_par_iter()
            .map(contribution)
            .reduce(Sums::default, Sums::add)
    } else {
        (0..ensemble.len())
            .map(contribution)
            .fold(Sums::default(), Sums::add)
    };

    if sums.weight == 0.0 || !sums.weight.is_finite() {
        return Err(VmcError::NumericalInstability(format!(
            "sum of correlated-sampling weights is {} for parameters {:?}",
            sums.weight, params
        )));
    }

    let energy = sums.e_loc / sums.weight;
    let variance = (sums.e_loc_2 / sums.weight - energy * energy) / sums.weight;
    if !energy.is_finite() || !variance.is_finite() {
        return Err(VmcError::NumericalInstability(format!(
            "non-finite estimate E = {}, var = {} for parameters {:?}",
            energy, variance, params
        )));
    }

    Ok(Estimate { energy, variance })
}
