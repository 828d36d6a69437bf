//! Stochastic search over the variational parameters.
//!
//! A second Metropolis-like walk, this time in parameter space. Each proposal
//! is scored with the correlated-sampling estimator on the fixed ensemble and
//! accepted when the energy goes down, or otherwise when the ratio of the
//! previous to the proposed energy beats a uniform draw.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::error::{Result, VmcError};
use super::ensemble::Ensemble;
use super::estimator::{estimate, Estimate};
use super::traits::EnergyCalculator;

/// One accepted point of the parameter walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Search iteration that produced this record
    pub iteration: usize,
    pub params: Vec<f64>,
    pub energy: f64,
    /// Variance of the mean energy
    pub variance: f64,
}

impl SearchRecord {
    fn new(iteration: usize, params: Vec<f64>, estimate: Estimate) -> Self {
        Self {
            iteration,
            params,
            energy: estimate.energy,
            variance: estimate.variance,
        }
    }

    /// Display error bar sqrt(|σ²|).
    pub fn sigma(&self) -> f64 {
        self.variance.abs().sqrt()
    }
}

/// Lowest-energy accepted record seen so far.
#[derive(Clone, Debug, PartialEq)]
pub struct RunningMinimum {
    best: SearchRecord,
}

impl RunningMinimum {
    pub fn new(first: SearchRecord) -> Self {
        Self { best: first }
    }

    /// Replace the minimum if `candidate` is strictly lower. Returns whether
    /// it was replaced.
    pub fn update(&mut self, candidate: &SearchRecord) -> bool {
        if candidate.energy < self.best.energy {
            self.best = candidate.clone();
            true
        } else {
            false
        }
    }

    pub fn record(&self) -> &SearchRecord {
        &self.best
    }

    pub fn into_record(self) -> SearchRecord {
        self.best
    }
}

/// Acceptance rule for a proposed parameter move.
///
/// Downhill moves are always taken. Otherwise the move is taken when
/// `previous / candidate` exceeds a uniform draw. A zero candidate energy
/// makes the ratio undefined and the move is rejected without drawing.
pub fn accept_move<R: Rng + ?Sized>(previous: f64, candidate: f64, rng: &mut R) -> bool {
    if previous > candidate {
        return true;
    }
    if candidate == 0.0 {
        return false;
    }
    previous / candidate > rng.gen::<f64>()
}

/// Result of a full parameter search.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Accepted records in iteration order
    pub records: Vec<SearchRecord>,
    /// Comparison baseline after every iteration once the walk is seeded
    pub energy_trace: Vec<f64>,
    pub minimum: SearchRecord,
    /// Iterations whose estimate failed numerically
    pub failed: usize,
}

impl SearchOutcome {
    /// The current parameters when the walk stopped.
    pub fn last(&self) -> &SearchRecord {
        // the search never returns without at least one record
        &self.records[self.records.len() - 1]
    }
}

/// Settings of the parameter walk.
#[derive(Clone, Debug)]
pub struct ParameterSearch {
    /// Starting parameters
    pub start: Vec<f64>,
    /// Width of the uniform proposal in each dimension
    pub steps: Vec<f64>,
    pub n_iterations: usize,
    /// Inclusive [lo, hi] per dimension; proposals outside are redrawn
    pub bounds: Option<Vec<[f64; 2]>>,
    /// Redraws allowed before a bounded proposal is abandoned
    pub max_domain_retries: usize,
    /// Reduce the estimator sums with rayon
    pub parallel: bool,
}

impl ParameterSearch {
    pub fn new(start: Vec<f64>, steps: Vec<f64>, n_iterations: usize) -> Self {
        Self {
            start,
            steps,
            n_iterations,
            bounds: None,
            max_domain_retries: 10_000,
            parallel: true,
        }
    }

    pub fn with_bounds(mut self, bounds: Vec<[f64; 2]>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_max_domain_retries(mut self, n: usize) -> Self {
        self.max_domain_retries = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn in_bounds(&self, params: &[f64]) -> bool {
        match &self.bounds {
            Some(bounds) => params
                .iter()
                .zip(bounds)
                .all(|(p, [lo, hi])| *p >= *lo && *p <= *hi),
            None => true,
        }
    }

    /// Uniform move of width `steps[d]` around `current`, redrawn while it
    /// falls outside the bounds.
    pub fn propose<R: Rng + ?Sized>(&self, current: &[f64], rng: &mut R) -> Result<Vec<f64>> {
        for _ in 0..self.max_domain_retries.max(1) {
            let candidate: Vec<f64> = current
                .iter()
                .zip(&self.steps)
                .map(|(p, step)| p + (rng.gen::<f64>() - 0.5) * step)
                .collect();
            if self.in_bounds(&candidate) {
                return Ok(candidate);
            }
        }
        Err(VmcError::DomainRetriesExhausted {
            retries: self.max_domain_retries,
        })
    }

    /// Walk the parameters for `n_iterations` steps over a fixed ensemble.
    pub fn run<T, R>(&self, system: &T, ensemble: &Ensemble<T::Walker>, rng: &mut R) -> Result<SearchOutcome>
    where
        T: EnergyCalculator,
        R: Rng + ?Sized,
    {
        let mut current = self.start.clone();
        let mut records: Vec<SearchRecord> = Vec::new();
        let mut energy_trace: Vec<f64> = Vec::with_capacity(self.n_iterations);
        let mut minimum: Option<RunningMinimum> = None;
        let mut failed = 0;

        for iteration in 0..self.n_iterations {
            let candidate = self.propose(&current, rng)?;
            let est = match estimate(system, ensemble, &candidate, self.parallel) {
                Ok(est) => est,
                Err(err) => {
                    warn!("iteration {}: estimate rejected: {}", iteration, err);
                    failed += 1;
                    if let Some(&previous) = energy_trace.last() {
                        energy_trace.push(previous);
                    }
                    continue;
                }
            };
            debug!(
                "iteration {}: params = {:?}, E = {:.6}, var = {:.3e}",
                iteration, candidate, est.energy, est.variance
            );

            let accepted = match energy_trace.last() {
                // the first usable estimate seeds the walk unconditionally
                None => true,
                Some(&previous) => accept_move(previous, est.energy, rng),
            };
            if !accepted {
                if let Some(&previous) = energy_trace.last() {
                    energy_trace.push(previous);
                }
                continue;
            }

            let record = SearchRecord::new(iteration, candidate.clone(), est);
            if let Some(running) = minimum.as_mut() {
                if running.update(&record) {
                    debug!("iteration {}: new minimum E = {:.6}", iteration, est.energy);
                }
                info!("accepted: E = {:.6} with params {:?}, var = {:.3e}", est.energy, candidate, est.variance);
            } else {
                info!("first: E = {:.6} with params {:?}, var = {:.3e}", est.energy, candidate, est.variance);
                minimum = Some(RunningMinimum::new(record.clone()));
            }
            current = candidate;
            energy_trace.push(est.energy);
            records.push(record);
        }

        let minimum = minimum.ok_or(VmcError::NoFiniteEstimate)?.into_record();
        Ok(SearchOutcome {
            records,
            energy_trace,
            minimum,
            failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::metropolis::sample_chain;
    use crate::systems::HarmonicOscillator;
    use crate::wavefunction::TrialWfn;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn harmonic_ensemble(n: usize) -> (HarmonicOscillator, Ensemble<f64>) {
        let ho = HarmonicOscillator::new();
        let mut rng = ChaCha20Rng::seed_from_u64(19599);
        let x0 = ho.initialize(1.0, &mut rng);
        let chain = sample_chain(&ho, &[1.0], x0, 1.0, n, &mut rng);
        let ensemble = Ensemble::build(&ho, &[1.0], chain.walkers, n, true).unwrap();
        (ho, ensemble)
    }

    #[test]
    fn test_accept_move_rules() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(accept_move(1.0, 0.5, &mut rng));
        assert!(accept_move(-10.0, -20.0, &mut rng));
        assert!(!accept_move(-1.0, 0.0, &mut rng));
        // previous / candidate < 0 never beats a uniform draw
        assert!(!accept_move(-1.0, 2.0, &mut rng));
        // ratio above one always wins
        assert!(accept_move(-30.0, -25.0, &mut rng));
        assert!(!accept_move(0.0, 0.0, &mut rng));
    }

    #[test]
    fn test_running_minimum_only_decreases() {
        let rec = |iteration, energy| SearchRecord {
            iteration,
            params: vec![iteration as f64],
            energy,
            variance: 0.0,
        };
        let mut min = RunningMinimum::new(rec(0, 1.0));
        assert!(!min.update(&rec(1, 1.5)));
        assert!(min.update(&rec(2, 0.7)));
        assert!(!min.update(&rec(3, 0.7)));
        assert_eq!(min.record().iteration, 2);
    }

    #[test]
    fn test_bounded_proposal_stays_in_domain() {
        let search = ParameterSearch::new(vec![0.4], vec![0.8], 1).with_bounds(vec![[0.0, 1.5]]);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let p = search.propose(&[0.05], &mut rng).unwrap();
            assert!((0.0..=1.5).contains(&p[0]));
            assert!((p[0] - 0.05).abs() <= 0.4);
        }
    }

    #[test]
    fn test_unreachable_domain_fails_loudly() {
        let search = ParameterSearch::new(vec![5.0], vec![0.1], 1)
            .with_bounds(vec![[0.0, 1.5]])
            .with_max_domain_retries(50);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let err = search.propose(&[5.0], &mut rng).unwrap_err();
        assert!(matches!(err, VmcError::DomainRetriesExhausted { retries: 50 }));
    }

    #[test]
    fn test_search_invariants() {
        let (ho, ensemble) = harmonic_ensemble(5000);
        let search = ParameterSearch::new(vec![0.4], vec![0.8], 120).with_bounds(vec![[0.0, 1.5]]);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let outcome = search.run(&ho, &ensemble, &mut rng).unwrap();

        assert!(!outcome.records.is_empty());
        assert!(outcome.records.len() <= 120);
        assert_eq!(outcome.energy_trace.len(), 120);
        assert_eq!(outcome.records[0].iteration, 0);
        assert!(outcome.records.windows(2).all(|w| w[0].iteration < w[1].iteration));

        // running minimum equals the lowest accepted energy
        let lowest = outcome
            .records
            .iter()
            .map(|r| r.energy)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.minimum.energy, lowest);
        assert!(outcome.records.contains(&outcome.minimum));

        // every accepted energy appears in the trace at its iteration
        for rec in &outcome.records {
            assert_eq!(outcome.energy_trace[rec.iteration], rec.energy);
        }
    }

    #[test]
    fn test_search_is_reproducible() {
        let (ho, ensemble) = harmonic_ensemble(2000);
        let search = ParameterSearch::new(vec![0.4], vec![0.8], 40)
            .with_bounds(vec![[0.0, 1.5]])
            .with_parallel(false);
        let run = || {
            let mut rng = ChaCha20Rng::seed_from_u64(99);
            search.run(&ho, &ensemble, &mut rng).unwrap().records
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_failed_estimates_do_not_seed_or_corrupt() {
        // reference α = 0.01 with far-out walkers: large α underflows every weight
        let ho = HarmonicOscillator::new();
        let ensemble = Ensemble::build(&ho, &[0.01], vec![60.0, -70.0, 80.0], 3, false).unwrap();
        let search = ParameterSearch::new(vec![50.0], vec![1.0], 10);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let err = search.run(&ho, &ensemble, &mut rng).unwrap_err();
        assert!(matches!(err, VmcError::NoFiniteEstimate));
    }
}
