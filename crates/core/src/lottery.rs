// Lunch lottery
//
// Picks distinct winners uniformly from a list of names. The RNG is passed in
// so callers can seed it.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Upper bound on candidates accepted in a single draw
pub const MAX_CANDIDATES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LotteryError {
    #[error("at least one candidate is required")]
    NoCandidates,

    #[error("too many candidates: {0} (max: {MAX_CANDIDATES})")]
    TooManyCandidates(usize),

    #[error("count must be between 1 and {available} (got {requested})")]
    InvalidCount { requested: usize, available: usize },
}

/// Trim, drop blanks and drop repeats, keeping first-seen order
fn normalize(candidates: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_string()))
        .map(str::to_string)
        .collect()
}

/// Draw `count` distinct winners in random order.
pub fn draw<R: Rng + ?Sized>(
    candidates: &[String],
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>, LotteryError> {
    let mut pool = normalize(candidates);

    if pool.is_empty() {
        return Err(LotteryError::NoCandidates);
    }
    if pool.len() > MAX_CANDIDATES {
        return Err(LotteryError::TooManyCandidates(pool.len()));
    }
    if count == 0 || count > pool.len() {
        return Err(LotteryError::InvalidCount {
            requested: count,
            available: pool.len(),
        });
    }

    let (winners, _) = pool.partial_shuffle(rng, count);
    Ok(winners.to_vec())
}
