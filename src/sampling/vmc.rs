//! Correlated-sampling Variational Monte Carlo driver.
//!
//! This module wires the configuration walk, the ensemble cache and the
//! parameter search into one run:
//!
//! 1. sample configurations from |Ψ(p_ref)|² with Metropolis-Hastings,
//! 2. cache Ψ(p_ref) and V for the ensemble,
//! 3. walk the variational parameters, scoring every proposal on that ensemble.
//!
//! All random draws come from one seeded stream in this order, so a run is
//! reproducible from its seed.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::error::{Result, VmcError};
use crate::wavefunction::TrialWfn;
use super::ensemble::Ensemble;
use super::metropolis::sample_chain;
use super::search::{ParameterSearch, SearchOutcome, SearchRecord};
use super::traits::EnergyCalculator;

/// Parameters for a correlated-sampling VMC run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VmcParams {
    pub seed: u64,
    /// Metropolis moves of the configuration walk (N)
    pub n_moves: usize,
    /// Configuration walk step size
    pub walk_step: f64,
    /// Parameter search iterations (P)
    pub n_search: usize,
    /// Proposal width per parameter
    pub param_steps: Vec<f64>,
    /// Parameters the ensemble is sampled from; fixed for the run
    pub reference_params: Vec<f64>,
    /// Where the parameter walk begins
    pub start_params: Vec<f64>,
    /// Inclusive domain per parameter, if restricted
    #[serde(default)]
    pub bounds: Option<Vec<[f64; 2]>>,
    #[serde(default = "default_max_domain_retries")]
    pub max_domain_retries: usize,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_max_domain_retries() -> usize {
    10_000
}

fn default_parallel() -> bool {
    true
}

impl VmcParams {
    /// Reference run for the harmonic oscillator.
    pub fn harmonic() -> Self {
        Self {
            seed: 19599,
            n_moves: 10_000,
            walk_step: 1.0,
            n_search: 200,
            param_steps: vec![0.8],
            reference_params: vec![1.0],
            start_params: vec![0.4],
            bounds: Some(vec![[0.0, 1.5]]),
            max_domain_retries: default_max_domain_retries(),
            parallel: default_parallel(),
        }
    }

    /// Reference run for ⁴He; the reference parameters are Guardiola's.
    pub fn helium() -> Self {
        Self {
            seed: 12231,
            n_moves: 10_000,
            walk_step: 0.55,
            n_search: 135,
            param_steps: vec![0.05, 0.25, 0.50],
            reference_params: vec![0.08597, -0.7191, 2.13796],
            start_params: vec![0.2, -0.2, 1.0],
            // γ, β > 0 keep Ψ normalisable; the literal acceptance rule takes
            // every move once energies are negative
            bounds: Some(vec![[1e-6, 2.0], [-2.0, 2.0], [1e-6, 10.0]]),
            max_domain_retries: default_max_domain_retries(),
            parallel: default_parallel(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_n_moves(mut self, n: usize) -> Self {
        self.n_moves = n;
        self
    }

    pub fn with_n_search(mut self, n: usize) -> Self {
        self.n_search = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the run can start for a system with `num_params` parameters.
    pub fn validate(&self, num_params: usize) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(VmcError::InvalidConfig(msg)) };

        if self.n_moves == 0 {
            return invalid("n_moves must be positive".into());
        }
        if self.n_search == 0 {
            return invalid("n_search must be positive".into());
        }
        if !(self.walk_step.is_finite() && self.walk_step > 0.0) {
            return invalid(format!("walk_step must be positive, got {}", self.walk_step));
        }
        for (name, v) in [
            ("param_steps", &self.param_steps),
            ("reference_params", &self.reference_params),
            ("start_params", &self.start_params),
        ] {
            if v.len() != num_params {
                return invalid(format!("{} has {} entries, expected {}", name, v.len(), num_params));
            }
            if v.iter().any(|x| !x.is_finite()) {
                return invalid(format!("{} contains a non-finite value", name));
            }
        }
        if self.param_steps.iter().any(|&s| s <= 0.0) {
            return invalid("param_steps must be positive".into());
        }
        if let Some(bounds) = &self.bounds {
            if bounds.len() != num_params {
                return invalid(format!("bounds has {} entries, expected {}", bounds.len(), num_params));
            }
            for (d, [lo, hi]) in bounds.iter().enumerate() {
                if !(lo <= hi) {
                    return invalid(format!("empty domain [{}, {}] for parameter {}", lo, hi, d));
                }
                if self.start_params[d] < *lo || self.start_params[d] > *hi {
                    return invalid(format!("start parameter {} lies outside [{}, {}]", d, lo, hi));
                }
            }
            if self.max_domain_retries == 0 {
                return invalid("max_domain_retries must be positive".into());
            }
        }
        Ok(())
    }

    fn search(&self) -> ParameterSearch {
        let search = ParameterSearch::new(self.start_params.clone(), self.param_steps.clone(), self.n_search)
            .with_max_domain_retries(self.max_domain_retries)
            .with_parallel(self.parallel);
        match &self.bounds {
            Some(bounds) => search.with_bounds(bounds.clone()),
            None => search,
        }
    }
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct VmcRun {
    pub acceptance_ratio: f64,
    /// Configurations that entered the estimator
    pub ensemble_size: usize,
    pub search: SearchOutcome,
}

impl VmcRun {
    pub fn records(&self) -> &[SearchRecord] {
        &self.search.records
    }

    pub fn minimum(&self) -> &SearchRecord {
        &self.search.minimum
    }

    pub fn last(&self) -> &SearchRecord {
        self.search.last()
    }
}

/// Correlated-sampling VMC engine.
pub struct CorrelatedVmc<T: TrialWfn + EnergyCalculator> {
    system: T,
    params: VmcParams,
}

impl<T: TrialWfn + EnergyCalculator> CorrelatedVmc<T> {
    /// Fails fast on an unusable configuration.
    pub fn new(system: T, params: VmcParams) -> Result<Self> {
        params.validate(system.num_params())?;
        Ok(Self { system, params })
    }

    pub fn system(&self) -> &T {
        &self.system
    }

    pub fn params(&self) -> &VmcParams {
        &self.params
    }

    /// Run sampler, cache and search on a fresh stream seeded from the params.
    pub fn run(&self) -> Result<VmcRun> {
        let mut rng = ChaCha20Rng::seed_from_u64(self.params.seed);
        let p = &self.params;

        let initial = self.system.initialize(p.walk_step, &mut rng);
        let chain = sample_chain(&self.system, &p.reference_params, initial, p.walk_step, p.n_moves, &mut rng);

        let ensemble = Ensemble::build(&self.system, &p.reference_params, chain.walkers, p.n_moves, p.parallel)?;

        let search = p.search().run(&self.system, &ensemble, &mut rng)?;
        info!(
            "search finished: {} of {} iterations accepted, {} failed",
            search.records.len(),
            p.n_search,
            search.failed
        );

        Ok(VmcRun {
            acceptance_ratio: chain.acceptance_ratio,
            ensemble_size: ensemble.len(),
            search,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{HarmonicOscillator, Helium4};

    #[test]
    fn test_reference_params_validate() {
        assert!(VmcParams::harmonic().validate(1).is_ok());
        assert!(VmcParams::helium().validate(3).is_ok());
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let zero_moves = VmcParams::harmonic().with_n_moves(0);
        assert!(matches!(
            CorrelatedVmc::new(HarmonicOscillator::new(), zero_moves),
            Err(VmcError::InvalidConfig(_))
        ));

        let zero_search = VmcParams::helium().with_n_search(0);
        assert!(zero_search.validate(3).is_err());

        // helium parameters on the one-parameter system
        assert!(CorrelatedVmc::new(HarmonicOscillator::new(), VmcParams::helium()).is_err());

        let mut outside = VmcParams::harmonic();
        outside.start_params = vec![2.0];
        assert!(outside.validate(1).is_err());

        let mut empty = VmcParams::harmonic();
        empty.bounds = Some(vec![[1.0, 0.5]]);
        assert!(empty.validate(1).is_err());

        let mut bad_step = VmcParams::helium();
        bad_step.param_steps[1] = 0.0;
        assert!(bad_step.validate(3).is_err());
    }

    #[test]
    fn test_helium_proposals_stay_normalisable() {
        let params = VmcParams::helium();
        let search = params.search();
        let mut rng = ChaCha20Rng::seed_from_u64(12231);
        // near the edge of the domain, where an unbounded walk leaves it
        let mut current = vec![0.01, 1.9, 0.1];
        for _ in 0..2000 {
            let p = search.propose(&current, &mut rng).unwrap();
            assert!(p[0] > 0.0 && p[2] > 0.0, "{:?}", p);
            assert!(p[1].abs() <= 2.0);
            current = p;
        }
    }

    #[test]
    fn test_small_helium_run_is_reproducible() {
        let params = VmcParams::helium()
            .with_n_moves(300)
            .with_n_search(5)
            .with_parallel(false);
        let vmc = CorrelatedVmc::new(Helium4::new(), params).unwrap();
        let a = vmc.run().unwrap();
        let b = vmc.run().unwrap();
        assert_eq!(a.ensemble_size, 300);
        assert_eq!(a.acceptance_ratio, b.acceptance_ratio);
        assert_eq!(a.records(), b.records());
        assert_eq!(a.minimum(), b.minimum());
    }

    #[test]
    fn test_params_from_partial_yaml() {
        let yaml = "
seed: 1
n_moves: 100
walk_step: 1.0
n_search: 10
param_steps: [0.8]
reference_params: [1.0]
start_params: [0.4]
";
        let params: VmcParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(params.bounds, None);
        assert_eq!(params.max_domain_retries, 10_000);
        assert!(params.parallel);
    }
}
