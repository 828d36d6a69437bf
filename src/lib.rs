//! Rust VMC - correlated-sampling Variational Monte Carlo in Rust
//!
//! This crate samples configurations once from a reference trial
//! wavefunction, reweights them for every candidate parameter set, and
//! walks the parameter space with a Metropolis-style search to find the
//! lowest variational energy. Two systems are provided: the 1-D harmonic
//! oscillator and the ⁴He nucleus with a Gaussian pair potential.

pub mod error;
pub mod wavefunction;
pub mod correlation;
pub mod systems;
pub mod sampling;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{Result, VmcError};
pub use wavefunction::{Coordinates, TrialWfn};
pub use correlation::PairCorrelation;
pub use systems::{HarmonicOscillator, Helium4, KineticMethod, PairPotential};
pub use sampling::{CorrelatedVmc, EnergyCalculator, Estimate, SearchRecord, VmcParams, VmcRun};
pub use io::{read_harmonic_config, read_helium_config, HarmonicConfig, HeliumConfig};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rand_distr::{Distribution, Normal};

    use crate::systems::{Helium4, KineticMethod};
    use crate::sampling::EnergyCalculator;
    use crate::wavefunction::TrialWfn;

    const REFERENCE: [f64; 3] = [0.08597, -0.7191, 2.13796];

    fn nucleon() -> impl Strategy<Value = Vector3<f64>> {
        (-2.5..2.5f64, -2.5..2.5f64, -2.5..2.5f64).prop_map(|(x, y, z)| Vector3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn test_helium_permutation_symmetry(
            r in prop::collection::vec(nucleon(), 4),
            i in 0usize..4,
            j in 0usize..4,
        ) {
            let he = Helium4::new();
            let mut swapped = r.clone();
            swapped.swap(i, j);

            let psi = he.evaluate(&r, &REFERENCE);
            let psi_swapped = he.evaluate(&swapped, &REFERENCE);
            prop_assert!((psi - psi_swapped).abs() <= 1e-12 * psi.abs().max(1.0));

            let v = he.potential(&r);
            let v_swapped = he.potential(&swapped);
            prop_assert!((v - v_swapped).abs() <= 1e-9 * v.abs().max(1.0));
        }

        #[test]
        fn test_helium_rotation_invariance(
            r in prop::collection::vec(nucleon(), 4),
            angle in 0.0..std::f64::consts::TAU,
        ) {
            let he = Helium4::new();
            let rotation = nalgebra::Rotation3::from_axis_angle(&Vector3::z_axis(), angle);
            let rotated: Vec<Vector3<f64>> = r.iter().map(|x| rotation * x).collect();

            let psi = he.evaluate(&r, &REFERENCE);
            let psi_rotated = he.evaluate(&rotated, &REFERENCE);
            prop_assert!((psi - psi_rotated).abs() <= 1e-9 * psi.abs().max(1.0));
        }
    }

    #[test]
    fn test_helium_numerical_and_analytic_laplacian() {
        let he = Helium4::new();
        let h = 1e-4;

        let mut rng = ChaCha20Rng::seed_from_u64(12231);
        let dist = Normal::new(0.0, 0.8).unwrap();
        let r: Vec<Vector3<f64>> = (0..4)
            .map(|_| Vector3::<f64>::from_distribution(&dist, &mut rng))
            .collect();

        let analytical = he.laplacian(&r, &REFERENCE);
        let numerical = he.numerical_laplacian(&r, &REFERENCE, h);

        // Relaxed tolerance due to numerical differentiation sensitivity
        assert_relative_eq!(analytical, numerical, epsilon = 1e-3 * analytical.abs().max(1.0));
    }

    #[test]
    fn test_helium_local_energy_methods_agree() {
        let fd = Helium4::new();
        let exact = Helium4::new().with_kinetic(KineticMethod::Analytic);

        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let dist = Normal::new(0.0, 0.8).unwrap();
        let r: Vec<Vector3<f64>> = (0..4)
            .map(|_| Vector3::<f64>::from_distribution(&dist, &mut rng))
            .collect();

        let psi = fd.evaluate(&r, &REFERENCE);
        let v = fd.potential(&r);
        let e_fd = fd.local_energy(&r, &REFERENCE, psi, v);
        let e_exact = exact.local_energy(&r, &REFERENCE, psi, v);

        assert_relative_eq!(e_fd, e_exact, epsilon = 1e-2 * e_exact.abs().max(1.0));
    }
}
