//! Central two-nucleon potential written as a sum of Gaussians in the
//! squared pair distance d = r²:
//!
//!   v(d) = Σₖ Vₖ exp(-μₖ d)
//!
//! The default is the five-term form used for the ⁴He ground state.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use crate::correlation::{squared_distance, unique_pairs};

/// One Gaussian term `strength * exp(-range * d)`, strength in MeV.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GaussianTerm {
    pub strength: f64,
    pub range: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PairPotential {
    pub terms: Vec<GaussianTerm>,
}

impl Default for PairPotential {
    fn default() -> Self {
        let terms = [
            (1000.0, 3.0),
            (-165.35, 1.05),
            (-21.5, 0.6),
            (-83.0, 0.8),
            (-11.5, 0.4),
        ]
        .into_iter()
        .map(|(strength, range)| GaussianTerm { strength, range })
        .collect();
        Self { terms }
    }
}

impl PairPotential {
    /// Pair interaction at squared distance `d`.
    #[inline]
    pub fn pair(&self, d: f64) -> f64 {
        self.terms.iter().map(|t| t.strength * (-t.range * d).exp()).sum()
    }

    /// Total potential energy Σᵢ<ⱼ v(dᵢⱼ).
    pub fn total(&self, r: &[Vector3<f64>]) -> f64 {
        unique_pairs(r.len())
            .map(|(i, j)| self.pair(squared_distance(r, i, j)))
            .sum()
    }
}
