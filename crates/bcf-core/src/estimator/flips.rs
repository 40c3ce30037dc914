//! Coin flip simulation and tallying.

use bcf_common::{Error, Result};
use bcf_config::rules;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of a single flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Flip {
    Heads,
    Tails,
}

impl Flip {
    /// One-letter rendering used in the flip sequence.
    pub fn as_char(self) -> char {
        match self {
            Flip::Heads => 'H',
            Flip::Tails => 'T',
        }
    }

    pub fn is_heads(self) -> bool {
        matches!(self, Flip::Heads)
    }
}

impl std::fmt::Display for Flip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Heads and tails counted from a flip sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tally {
    pub heads: u64,
    pub tails: u64,
}

impl Tally {
    pub fn new(heads: u64, tails: u64) -> Self {
        Tally { heads, tails }
    }

    /// Total number of trials.
    pub fn trials(&self) -> u64 {
        self.heads + self.tails
    }
}

/// Build the random source: seeded when a seed is given, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub(crate) fn validate_trials(n: u64, p_true: f64) -> Result<()> {
    rules::flips(n).map_err(|m| Error::invalid("flips", m))?;
    rules::true_p(p_true).map_err(|m| Error::invalid("true_p", m))
}

/// Draw `n` independent flips with P(heads) = `p_true`.
///
/// The same seed, `n` and `p_true` always yield the same sequence.
///
/// # Example
/// ```
/// use bcf_core::estimator::simulate;
///
/// let a = simulate(20, 0.5, Some(7)).unwrap();
/// let b = simulate(20, 0.5, Some(7)).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn simulate(n: u64, p_true: f64, seed: Option<u64>) -> Result<Vec<Flip>> {
    validate_trials(n, p_true)?;
    let mut rng = make_rng(seed);
    Ok(draw_flips(&mut rng, n, p_true))
}

/// Draw flips from a caller-owned random source. Inputs must already be valid.
pub(crate) fn draw_flips<R: Rng + ?Sized>(rng: &mut R, n: u64, p_true: f64) -> Vec<Flip> {
    let capacity = usize::try_from(n).unwrap_or(usize::MAX);
    let mut flips = Vec::with_capacity(capacity);
    for _ in 0..n {
        // Uniform draw in [0, 1): p_true = 1.0 always lands heads.
        let flip = if rng.random::<f64>() < p_true {
            Flip::Heads
        } else {
            Flip::Tails
        };
        flips.push(flip);
    }
    flips
}

/// Count heads and tails.
pub fn tally(outcomes: &[Flip]) -> Tally {
    let heads = outcomes.iter().filter(|f| f.is_heads()).count() as u64;
    Tally {
        heads,
        tails: outcomes.len() as u64 - heads,
    }
}
