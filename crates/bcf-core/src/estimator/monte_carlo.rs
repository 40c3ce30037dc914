//! Monte Carlo cross-check of the closed-form summaries.
//!
//! Draws from the posterior and reports empirical counterparts of the
//! credible interval, P(p > 0.5) and the fair-band probability. Agreement
//! with the closed-form numbers is a sanity check on the numerics.

use bcf_common::{Error, Result};
use bcf_config::{rules, MIN_MC_SAMPLES};
use bcf_math::BetaParams;
use rand::Rng;
use rand_distr::{Beta, Distribution};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::posterior::{validate_confidence, validate_fair_band, FAIR_POINT};

/// Empirical statistics from posterior draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonteCarloCheck {
    pub samples: u64,
    pub mean: f64,
    pub interval_low: f64,
    pub interval_high: f64,
    /// Share of draws above 0.5.
    pub tail_prob: f64,
    /// Share of draws within the fair band.
    pub fair_band_prob: f64,
}

/// Draw `samples` values from the posterior and summarize them.
pub fn cross_check<R: Rng + ?Sized>(
    rng: &mut R,
    posterior: &BetaParams,
    samples: u64,
    confidence: f64,
    fair_band: f64,
) -> Result<MonteCarloCheck> {
    if samples == 0 {
        return Err(Error::invalid(
            "mc_samples",
            format!("need at least {MIN_MC_SAMPLES} draws, got 0"),
        ));
    }
    rules::mc_samples(samples).map_err(|m| Error::invalid("mc_samples", m))?;
    validate_confidence(confidence)?;
    validate_fair_band(fair_band)?;

    let dist = Beta::new(posterior.alpha, posterior.beta).map_err(|e| {
        Error::invalid("posterior", format!("cannot sample from {posterior}: {e}"))
    })?;

    let capacity = usize::try_from(samples).unwrap_or(usize::MAX);
    let mut draws: Vec<f64> = Vec::with_capacity(capacity);
    for _ in 0..samples {
        draws.push(dist.sample(rng));
    }
    draws.sort_by(|a, b| a.total_cmp(b));

    let n = draws.len() as f64;
    let tail = (1.0 - confidence) / 2.0;
    let above = draws.iter().filter(|&&p| p > FAIR_POINT).count() as f64;
    let near_fair = draws
        .iter()
        .filter(|&&p| (p - FAIR_POINT).abs() < fair_band)
        .count() as f64;

    Ok(MonteCarloCheck {
        samples,
        mean: draws.iter().sum::<f64>() / n,
        interval_low: empirical_quantile(&draws, tail),
        interval_high: empirical_quantile(&draws, 1.0 - tail),
        tail_prob: above / n,
        fair_band_prob: near_fair / n,
    })
}

/// Linearly interpolated quantile of sorted data.
pub fn empirical_quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() || q.is_nan() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let h = q * (sorted.len() - 1) as f64;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}
