//! Two-body correlation factor for the nucleon cluster.
//!
//! The trial wavefunction is a product over unordered pairs
//!
//!   Ψ(R) = Πᵢ<ⱼ f(dᵢⱼ),   f(d) = exp(-γ d) + a exp(-β d)
//!
//! where dᵢⱼ = |rᵢ - rⱼ|² is the *squared* pair distance.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Generate all unique particle pairs (i, j) with i < j.
pub fn unique_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// Squared Euclidean distance between particles `i` and `j`.
#[inline]
pub fn squared_distance(r: &[Vector3<f64>], i: usize, j: usize) -> f64 {
    (r[i] - r[j]).norm_squared()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PairCorrelation {
    pub gamma: f64,
    pub a: f64,
    pub beta: f64,
}

impl PairCorrelation {
    /// Build from a `[gamma, a, beta]` parameter vector.
    pub fn from_params(params: &[f64]) -> Self {
        Self {
            gamma: params[0],
            a: params[1],
            beta: params[2],
        }
    }

    #[inline]
    pub fn value(&self, d: f64) -> f64 {
        (-self.gamma * d).exp() + self.a * (-self.beta * d).exp()
    }

    /// Returns (f, df/dd, d²f/dd²).
    #[inline]
    pub fn value_and_derivatives(&self, d: f64) -> (f64, f64, f64) {
        let eg = (-self.gamma * d).exp();
        let eb = self.a * (-self.beta * d).exp();
        (
            eg + eb,
            -self.gamma * eg - self.beta * eb,
            self.gamma * self.gamma * eg + self.beta * self.beta * eb,
        )
    }

    /// Ψ(R) as the product of `f` over all pairs.
    pub fn product(&self, r: &[Vector3<f64>]) -> f64 {
        unique_pairs(r.len())
            .map(|(i, j)| self.value(squared_distance(r, i, j)))
            .product()
    }

    /// Closed-form ∇²Ψ summed over all particles.
    ///
    /// With g = ln f, each pair contributes ∇ᵢg = 2g'(d) rᵢⱼ and
    /// ∇ᵢ²g = 4d g'' + 6g'. Then ∇²Ψ/Ψ = Σₖ [∇ₖ² ln Ψ + |∇ₖ ln Ψ|²].
    pub fn product_laplacian(&self, r: &[Vector3<f64>]) -> f64 {
        let n = r.len();
        let mut grad_log = vec![Vector3::zeros(); n];
        let mut lap_log = 0.0;
        let mut psi = 1.0;

        for (i, j) in unique_pairs(n) {
            let r_ij = r[i] - r[j];
            let d = r_ij.norm_squared();
            let (f, df, d2f) = self.value_and_derivatives(d);
            psi *= f;
            let g1 = df / f;
            let g2 = d2f / f - g1 * g1;
            // both particles of the pair see the same ∇² ln f
            lap_log += 2.0 * (4.0 * d * g2 + 6.0 * g1);
            let grad = 2.0 * g1 * r_ij;
            grad_log[i] += grad;
            grad_log[j] -= grad;
        }

        let grad_sq: f64 = grad_log.iter().map(|g| g.norm_squared()).sum();
        psi * (lap_log + grad_sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn guardiola() -> PairCorrelation {
        PairCorrelation::from_params(&[0.08597, -0.7191, 2.13796])
    }

    #[test]
    fn test_unique_pairs_count() {
        assert_eq!(unique_pairs(4).count(), 6);
        assert_eq!(unique_pairs(1).count(), 0);
        let pairs: Vec<_> = unique_pairs(3).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_pair_value_at_contact() {
        let corr = guardiola();
        assert_relative_eq!(corr.value(0.0), 1.0 - 0.7191, epsilon = 1e-12);
    }

    #[test]
    fn test_derivatives_match_finite_difference() {
        let corr = guardiola();
        let d = 0.7;
        let h = 1e-5;
        let (_, df, d2f) = corr.value_and_derivatives(d);
        let num_df = (corr.value(d + h) - corr.value(d - h)) / (2.0 * h);
        let num_d2f = (corr.value(d + h) + corr.value(d - h) - 2.0 * corr.value(d)) / (h * h);
        assert_relative_eq!(df, num_df, epsilon = 1e-7);
        assert_relative_eq!(d2f, num_d2f, epsilon = 1e-3);
    }

    #[test]
    fn test_product_of_two_particles_is_single_factor() {
        let corr = guardiola();
        let r = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0)];
        assert_relative_eq!(corr.product(&r), corr.value(2.0), epsilon = 1e-14);
    }
}
