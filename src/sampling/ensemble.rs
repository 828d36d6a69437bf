//! Read-only configuration ensemble with per-configuration caches.
//!
//! Ψ(R; p_ref) and V(R) do not depend on the trial parameters, so they are
//! computed once and reused by every correlated-sampling estimate.

use rayon::prelude::*;
use tracing::{info, warn};
use crate::error::{Result, VmcError};
use super::traits::EnergyCalculator;

#[derive(Clone, Debug)]
pub struct Ensemble<W> {
    walkers: Vec<W>,
    psi_ref: Vec<f64>,
    potential: Vec<f64>,
    skipped: usize,
}

impl<W: Send + Sync> Ensemble<W> {
    /// Cache Ψ_ref and V for the first `n_used` configurations of the chain.
    ///
    /// Configurations whose reference value is zero or not finite would give
    /// an undefined reweighting factor; they are dropped with a warning.
    pub fn build<T>(system: &T, reference: &[f64], chain: Vec<W>, n_used: usize, parallel: bool) -> Result<Self>
    where
        T: EnergyCalculator<Walker = W>,
    {
        let mut chain = chain;
        chain.truncate(n_used);

        let cache = |r: &W| (system.evaluate(r, reference), system.potential(r));
        let values: Vec<(f64, f64)> = if parallel {
            chain.par_iter().map(cache).collect()
        } else {
            chain.iter().map(cache).collect()
        };

        let total = chain.len();
        let mut walkers = Vec::with_capacity(total);
        let mut psi_ref = Vec::with_capacity(total);
        let mut potential = Vec::with_capacity(total);
        for (idx, (r, (psi, v))) in chain.into_iter().zip(values).enumerate() {
            if psi == 0.0 || !psi.is_finite() {
                warn!("configuration {} has reference wavefunction {}, skipped", idx, psi);
                continue;
            }
            walkers.push(r);
            psi_ref.push(psi);
            potential.push(v);
        }

        if walkers.is_empty() {
            return Err(VmcError::EmptyEnsemble);
        }
        let skipped = total - walkers.len();
        info!("ensemble cache: {} configurations ({} skipped)", walkers.len(), skipped);

        Ok(Self {
            walkers,
            psi_ref,
            potential,
            skipped,
        })
    }

    pub fn len(&self) -> usize {
        self.walkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkers.is_empty()
    }

    pub fn walkers(&self) -> &[W] {
        &self.walkers
    }

    pub fn psi_ref(&self) -> &[f64] {
        &self.psi_ref
    }

    pub fn potential(&self) -> &[f64] {
        &self.potential
    }

    /// Number of chain entries dropped for an unusable reference value.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
