//! Wave function traits for correlated-sampling VMC.
//!
//! `Coordinates` gives flat access to the Cartesian components of a walker so
//! random-walk proposals and finite differences can be written once.
//! `TrialWfn` is a trial wavefunction whose variational parameters are passed
//! explicitly, so a single instance can be evaluated under both the reference
//! and the trial parameter sets.

use nalgebra::Vector3;
use rand::Rng;

/// Flat view over the coordinates of a particle configuration.
pub trait Coordinates: Clone + Send + Sync {
    fn num_coords(&self) -> usize;
    fn coord(&self, k: usize) -> f64;
    fn coord_mut(&mut self, k: usize) -> &mut f64;
}

impl Coordinates for f64 {
    fn num_coords(&self) -> usize {
        1
    }

    fn coord(&self, _k: usize) -> f64 {
        *self
    }

    fn coord_mut(&mut self, _k: usize) -> &mut f64 {
        self
    }
}

/// Particle-major layout: coordinate `k` is axis `k % 3` of particle `k / 3`.
impl Coordinates for Vec<Vector3<f64>> {
    fn num_coords(&self) -> usize {
        3 * self.len()
    }

    fn coord(&self, k: usize) -> f64 {
        self[k / 3][k % 3]
    }

    fn coord_mut(&mut self, k: usize) -> &mut f64 {
        &mut self[k / 3][k % 3]
    }
}

/// Trial wavefunction Ψ(R; p) with an explicit parameter vector `p`.
pub trait TrialWfn: Sync {
    type Walker: Coordinates;

    /// Number of variational parameters.
    fn num_params(&self) -> usize;

    /// Starting configuration for the random walk of step size `step`.
    fn initialize<R: Rng + ?Sized>(&self, step: f64, rng: &mut R) -> Self::Walker;

    /// Evaluate Ψ at configuration `r` for parameters `params`.
    fn evaluate(&self, r: &Self::Walker, params: &[f64]) -> f64;

    /// Closed-form Laplacian ∇²Ψ summed over every coordinate.
    fn laplacian(&self, r: &Self::Walker, params: &[f64]) -> f64;

    /// Symmetric random-walk proposal: every coordinate moves by
    /// `step * (u - 0.5)` with `u` uniform on [0, 1).
    fn propose<R: Rng + ?Sized>(&self, r: &Self::Walker, step: f64, rng: &mut R) -> Self::Walker {
        let mut candidate = r.clone();
        for k in 0..candidate.num_coords() {
            *candidate.coord_mut(k) += step * (rng.gen::<f64>() - 0.5);
        }
        candidate
    }

    /// Laplacian from the second-order central difference
    /// [Ψ(x + h) + Ψ(x - h) - 2Ψ(x)] / h², summed over every coordinate.
    fn numerical_laplacian(&self, r: &Self::Walker, params: &[f64], h: f64) -> f64 {
        let psi = self.evaluate(r, params);
        let mut laplacian = 0.0;
        for k in 0..r.num_coords() {
            let mut r_fwd = r.clone();
            let mut r_bwd = r.clone();
            *r_fwd.coord_mut(k) += h;
            *r_bwd.coord_mut(k) -= h;
            laplacian += (self.evaluate(&r_fwd, params) + self.evaluate(&r_bwd, params) - 2.0 * psi) / (h * h);
        }
        laplacian
    }
}
