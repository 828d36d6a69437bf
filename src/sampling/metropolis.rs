//! Metropolis-Hastings random walk over particle configurations.
//!
//! Produces a chain distributed as |Ψ(R; p_ref)|² with a symmetric uniform
//! proposal, so the acceptance ratio reduces to (Ψ(R')/Ψ(R))².

use rand::Rng;
use tracing::info;
use crate::wavefunction::TrialWfn;

/// Output of the configuration walk.
#[derive(Clone, Debug)]
pub struct Chain<W> {
    /// The initial configuration followed by one entry per move
    pub walkers: Vec<W>,
    pub accepted: usize,
    pub acceptance_ratio: f64,
}

/// Run `n_moves` Metropolis moves of size `step` starting from `initial`.
///
/// Rejected moves repeat an owned copy of the current configuration, so the
/// chain always holds `n_moves + 1` entries.
pub fn sample_chain<T, R>(
    wfn: &T,
    reference: &[f64],
    initial: T::Walker,
    step: f64,
    n_moves: usize,
    rng: &mut R,
) -> Chain<T::Walker>
where
    T: TrialWfn,
    R: Rng + ?Sized,
{
    let mut walkers = Vec::with_capacity(n_moves + 1);
    let mut current = initial;
    let mut psi_current = wfn.evaluate(&current, reference);
    walkers.push(current.clone());
    let mut accepted = 0;

    for _ in 0..n_moves {
        let candidate = wfn.propose(&current, step, rng);
        let psi_candidate = wfn.evaluate(&candidate, reference);
        let ratio = (psi_candidate / psi_current).powi(2);

        if ratio > 1.0 || ratio > rng.gen::<f64>() {
            current = candidate;
            psi_current = psi_candidate;
            accepted += 1;
        }
        walkers.push(current.clone());
    }

    let acceptance_ratio = if n_moves == 0 {
        0.0
    } else {
        accepted as f64 / n_moves as f64
    };
    info!(
        "configuration walk: {} moves, acceptance ratio = {:.2}%",
        n_moves,
        100.0 * acceptance_ratio
    );

    Chain {
        walkers,
        accepted,
        acceptance_ratio,
    }
}
