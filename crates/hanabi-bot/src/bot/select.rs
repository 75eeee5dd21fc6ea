//! Final pruning and the one stochastic step of a decision cycle.

use super::params::BotParams;
use super::score::ScoredCandidate;
use core::cmp::Ordering;
use core::fmt;
use rand::Rng;
use rand::rngs::SmallRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateError {
    /// The generator contract guarantees at least one candidate; an empty
    /// pool means that contract was broken upstream.
    EmptyCandidateSet,
}

impl fmt::Display for CandidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateError::EmptyCandidateSet => f.write_str("no candidate actions to select from"),
        }
    }
}

impl std::error::Error for CandidateError {}

/// Prunes the pool to near-best candidates and samples one by reward
/// weight.
///
/// Greedy play gets stuck in local habits, so everything within the
/// retain band keeps a proportional chance. In a losing position (best
/// reward negative) the single least-bad action is taken without
/// randomness.
pub fn select(
    mut pool: Vec<ScoredCandidate>,
    params: &BotParams,
    rng: &mut SmallRng,
) -> Result<ScoredCandidate, CandidateError> {
    if pool.is_empty() {
        return Err(CandidateError::EmptyCandidateSet);
    }

    pool.sort_by(|a, b| b.reward.partial_cmp(&a.reward).unwrap_or(Ordering::Equal));
    let best = pool[0].reward;
    pool.retain(|candidate| best - candidate.reward <= params.retain_band);

    if best > 0.0 && pool.iter().any(|candidate| candidate.reward < 0.0) {
        pool.retain(|candidate| candidate.reward > 0.0);
    } else if best < 0.0 {
        pool.truncate(1);
    }

    let offset = if best < 0.0 {
        -pool
            .iter()
            .map(|candidate| candidate.reward)
            .fold(f64::INFINITY, f64::min)
    } else {
        0.0
    };
    let weights: Vec<f64> = pool
        .iter()
        .map(|candidate| (candidate.reward + offset).max(0.0))
        .collect();
    let total: f64 = weights.iter().sum();

    let index = if total > 0.0 {
        let mut ticket = rng.gen_range(0.0..total);
        let mut chosen = pool.len() - 1;
        for (i, weight) in weights.iter().enumerate() {
            if ticket < *weight {
                chosen = i;
                break;
            }
            ticket -= weight;
        }
        chosen
    } else {
        // No usable weights; draw uniformly rather than divide by zero.
        rng.gen_range(0..pool.len())
    };

    Ok(pool.swap_remove(index))
}
