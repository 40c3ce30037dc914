//! Beta-Bernoulli conjugate model for coin flips.
//!
//! The model uses:
//! - Prior: `p ~ Beta(α, β)`
//! - Likelihood: each flip `x | p ~ Bernoulli(p)`, heads = 1
//! - Posterior after h heads and t tails: `p | data ~ Beta(α + h, β + t)`
//!
//! The update is exact: counts are added to the shapes with no tempering.

use serde::{Deserialize, Serialize};

use super::beta::{beta_cdf, beta_inv_cdf, beta_mode, beta_sf};

/// Parameters for a Beta distribution used in Beta-Bernoulli conjugate updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Shape parameter alpha (heads + prior)
    pub alpha: f64,
    /// Shape parameter beta (tails + prior)
    pub beta: f64,
}

impl BetaParams {
    /// Create new Beta parameters with validation.
    ///
    /// Returns None if parameters are invalid (non-positive, infinite or NaN).
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return None;
        }
        Some(Self { alpha, beta })
    }

    /// Create Beta(1, 1) uniform prior.
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Create a Jeffreys prior Beta(0.5, 0.5).
    pub fn jeffreys() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
        }
    }

    /// Posterior mean E[p] = α / (α + β).
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Posterior variance Var[p] = αβ / ((α+β)²(α+β+1)).
    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        (self.alpha * self.beta) / (sum * sum * (sum + 1.0))
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Mode of the distribution, if it has a single finite maximum.
    ///
    /// See [`beta_mode`] for the exact conditions.
    pub fn mode(&self) -> Option<f64> {
        beta_mode(self.alpha, self.beta)
    }
}

impl Default for BetaParams {
    fn default() -> Self {
        Self::uniform()
    }
}

impl std::fmt::Display for BetaParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Beta({}, {})", self.alpha, self.beta)
    }
}

/// Compute posterior parameters after observing `heads` and `tails`.
///
/// Returns None when the prior itself is invalid.
///
/// # Example
/// ```
/// use bcf_math::conjugate::{BetaParams, posterior_params};
///
/// let prior = BetaParams::uniform();
/// let posterior = posterior_params(&prior, 7, 3).unwrap();
/// assert_eq!(posterior, BetaParams { alpha: 8.0, beta: 4.0 });
/// ```
pub fn posterior_params(prior: &BetaParams, heads: u64, tails: u64) -> Option<BetaParams> {
    BetaParams::new(prior.alpha + heads as f64, prior.beta + tails as f64)
}

/// Equal-tailed credible interval for the heads probability.
///
/// `level` must lie in (0, 1), e.g. 0.95 for a 95% interval; anything else
/// yields `(NaN, NaN)`.
pub fn credible_interval(posterior: &BetaParams, level: f64) -> (f64, f64) {
    if level.is_nan() || level <= 0.0 || level >= 1.0 {
        return (f64::NAN, f64::NAN);
    }

    let tail = (1.0 - level) / 2.0;
    let lower = beta_inv_cdf(tail, posterior.alpha, posterior.beta);
    let upper = beta_inv_cdf(1.0 - tail, posterior.alpha, posterior.beta);

    (lower, upper)
}

/// Posterior probability that p exceeds `threshold`.
pub fn tail_probability(posterior: &BetaParams, threshold: f64) -> f64 {
    beta_sf(threshold, posterior.alpha, posterior.beta)
}

/// Posterior mass between `low` and `high`.
pub fn interval_mass(posterior: &BetaParams, low: f64, high: f64) -> f64 {
    if low.is_nan() || high.is_nan() {
        return f64::NAN;
    }
    if high <= low {
        return 0.0;
    }
    let upper = beta_cdf(high, posterior.alpha, posterior.beta);
    let lower = beta_cdf(low, posterior.alpha, posterior.beta);
    (upper - lower).max(0.0)
}
