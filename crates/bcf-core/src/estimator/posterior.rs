//! Conjugate update and closed-form posterior summaries.
//!
//! Every statistic here is a pure function of the posterior shapes. The
//! numeric kernels live in `bcf-math`; this module validates inputs and turns
//! undefined results into typed errors.

use bcf_common::{Error, Result};
use bcf_config::rules;
use bcf_math::conjugate::{credible_interval, interval_mass, posterior_params, tail_probability};
use bcf_math::BetaParams;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::flips::Tally;

/// Threshold for the "heads favored" tail probability.
pub const FAIR_POINT: f64 = 0.5;

/// Validate a pair of prior shapes.
pub fn prior_from_shapes(alpha: f64, beta: f64) -> Result<BetaParams> {
    rules::shape(alpha).map_err(|m| Error::invalid("alpha", m))?;
    rules::shape(beta).map_err(|m| Error::invalid("beta", m))?;
    Ok(BetaParams { alpha, beta })
}

pub(crate) fn validate_confidence(confidence: f64) -> Result<()> {
    rules::confidence(confidence).map_err(|m| Error::invalid("confidence", m))
}

pub(crate) fn validate_fair_band(eps: f64) -> Result<()> {
    rules::fair_band(eps).map_err(|m| Error::invalid("fair_band", m))
}

/// Conjugate update: Beta(α, β) with h heads and t tails becomes Beta(α + h, β + t).
///
/// # Example
/// ```
/// use bcf_core::estimator::{update, Tally};
/// use bcf_math::BetaParams;
///
/// let post = update(&BetaParams::uniform(), Tally::new(10, 0)).unwrap();
/// assert_eq!(post, BetaParams { alpha: 11.0, beta: 1.0 });
/// ```
pub fn update(prior: &BetaParams, tally: Tally) -> Result<BetaParams> {
    let prior = prior_from_shapes(prior.alpha, prior.beta)?;
    posterior_params(&prior, tally.heads, tally.tails).ok_or_else(|| {
        Error::invalid(
            "tally",
            format!(
                "posterior {} + ({}, {}) is not a valid Beta distribution",
                prior, tally.heads, tally.tails
            ),
        )
    })
}

/// Posterior mode, `(α - 1) / (α + β - 2)`.
///
/// Defined when both shapes are at least 1 and the density is not flat, so a
/// Beta(11, 1) posterior has its mode at the boundary 1.0.
pub fn map_estimate(posterior: &BetaParams) -> Result<f64> {
    if let Some(mode) = posterior.mode() {
        return Ok(mode);
    }
    let reason = if posterior.alpha == 1.0 && posterior.beta == 1.0 {
        "density is flat, every point is a mode".to_string()
    } else if posterior.alpha < 1.0 && posterior.beta < 1.0 {
        "density is unbounded at both 0 and 1".to_string()
    } else if posterior.alpha < 1.0 {
        "density is unbounded at 0".to_string()
    } else if posterior.beta < 1.0 {
        "density is unbounded at 1".to_string()
    } else {
        "shape parameters are invalid".to_string()
    };
    Err(Error::NotDefined {
        statistic: "MAP",
        distribution: posterior.to_string(),
        reason,
    })
}

/// MAP as a report field: either a value or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapEstimate {
    Defined { value: f64 },
    Undefined { reason: String },
}

impl MapEstimate {
    pub fn of(posterior: &BetaParams) -> Self {
        match map_estimate(posterior) {
            Ok(value) => MapEstimate::Defined { value },
            Err(Error::NotDefined { reason, .. }) => MapEstimate::Undefined { reason },
            Err(other) => MapEstimate::Undefined {
                reason: other.to_string(),
            },
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MapEstimate::Defined { value } => Some(*value),
            MapEstimate::Undefined { .. } => None,
        }
    }
}

/// Equal-tailed credible interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CredibleInterval {
    pub level: f64,
    pub low: f64,
    pub high: f64,
}

impl CredibleInterval {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, p: f64) -> bool {
        self.low <= p && p <= self.high
    }
}

/// Posterior mass within `eps` of a fair coin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FairBand {
    pub eps: f64,
    pub probability: f64,
}

/// Closed-form summary of a posterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PosteriorSummary {
    pub mean: f64,
    pub map: MapEstimate,
    pub interval: CredibleInterval,
    /// P(p > 0.5).
    pub tail_prob: f64,
    pub std_dev: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fair_band: Option<FairBand>,
}

/// Mean, MAP, credible interval and P(p > 0.5) for a posterior.
///
/// An undefined MAP does not fail the summary; it is carried as
/// [`MapEstimate::Undefined`].
pub fn summarize(posterior: &BetaParams, confidence: f64) -> Result<PosteriorSummary> {
    let posterior = prior_from_shapes(posterior.alpha, posterior.beta)?;
    validate_confidence(confidence)?;

    let (low, high) = credible_interval(&posterior, confidence);
    if low.is_nan() || high.is_nan() {
        return Err(Error::invalid(
            "confidence",
            format!("no credible interval at level {confidence} for {posterior}"),
        ));
    }

    Ok(PosteriorSummary {
        mean: posterior.mean(),
        map: MapEstimate::of(&posterior),
        interval: CredibleInterval {
            level: confidence,
            low,
            high,
        },
        tail_prob: tail_probability(&posterior, FAIR_POINT),
        std_dev: posterior.std_dev(),
        fair_band: None,
    })
}

/// P(|p - 0.5| < eps) under the posterior.
pub fn fair_band_probability(posterior: &BetaParams, eps: f64) -> Result<f64> {
    validate_fair_band(eps)?;
    Ok(interval_mass(posterior, FAIR_POINT - eps, FAIR_POINT + eps))
}

impl PosteriorSummary {
    /// Attach the fair-band probability for `eps`.
    pub fn with_fair_band(mut self, posterior: &BetaParams, eps: f64) -> Result<Self> {
        let probability = fair_band_probability(posterior, eps)?;
        self.fair_band = Some(FairBand { eps, probability });
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcf_math::beta_cdf;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn update_adds_counts() {
        let prior = BetaParams { alpha: 2.0, beta: 3.0 };
        let post = update(&prior, Tally::new(4, 6)).unwrap();
        assert_eq!(post, BetaParams { alpha: 6.0, beta: 9.0 });
    }

    #[test]
    fn update_without_data_is_identity() {
        let prior = BetaParams { alpha: 0.5, beta: 0.5 };
        assert_eq!(update(&prior, Tally::default()).unwrap(), prior);
    }

    #[test]
    fn update_rejects_bad_prior() {
        let err = update(&BetaParams { alpha: 0.0, beta: 1.0 }, Tally::new(1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "alpha", .. }));
        let err = update(&BetaParams { alpha: 1.0, beta: f64::NAN }, Tally::new(1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "beta", .. }));
    }

    #[test]
    fn map_boundary_mode() {
        let post = BetaParams { alpha: 11.0, beta: 1.0 };
        assert_eq!(map_estimate(&post).unwrap(), 1.0);
    }

    #[test]
    fn map_interior_mode() {
        let post = BetaParams { alpha: 7.0, beta: 7.0 };
        assert!(close(map_estimate(&post).unwrap(), 0.5, 1e-12));
    }

    #[test]
    fn map_undefined_for_flat() {
        let err = map_estimate(&BetaParams::uniform()).unwrap_err();
        match err {
            Error::NotDefined {
                statistic, reason, ..
            } => {
                assert_eq!(statistic, "MAP");
                assert!(reason.contains("flat"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn map_undefined_for_u_shape() {
        let err = map_estimate(&BetaParams::jeffreys()).unwrap_err();
        assert_eq!(err.code(), 20);
        assert!(matches!(
            MapEstimate::of(&BetaParams { alpha: 0.5, beta: 3.0 }),
            MapEstimate::Undefined { .. }
        ));
    }

    #[test]
    fn summary_interval_holds_mass() {
        let post = BetaParams { alpha: 8.0, beta: 4.0 };
        let s = summarize(&post, 0.9).unwrap();
        assert!(s.interval.low <= s.interval.high);
        let mass = beta_cdf(s.interval.high, 8.0, 4.0) - beta_cdf(s.interval.low, 8.0, 4.0);
        assert!(close(mass, 0.9, 1e-8), "mass={mass}");
        assert!(s.interval.contains(s.mean));
    }

    #[test]
    fn summary_rejects_bad_confidence() {
        let post = BetaParams::uniform();
        for c in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let err = summarize(&post, c).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { name: "confidence", .. }));
        }
    }

    #[test]
    fn summary_keeps_undefined_map() {
        let s = summarize(&BetaParams::uniform(), 0.95).unwrap();
        assert!(close(s.mean, 0.5, 1e-12));
        assert!(s.map.value().is_none());
        assert!(close(s.tail_prob, 0.5, 1e-12));
        assert!(close(s.interval.low, 0.025, 1e-9));
        assert!(close(s.interval.high, 0.975, 1e-9));
    }

    #[test]
    fn fair_band_uniform() {
        let p = fair_band_probability(&BetaParams::uniform(), 0.05).unwrap();
        assert!(close(p, 0.1, 1e-10));
    }

    #[test]
    fn fair_band_rejects_bad_eps() {
        for eps in [0.0, -0.1, 0.6, f64::NAN] {
            let err = fair_band_probability(&BetaParams::uniform(), eps).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { name: "fair_band", .. }));
        }
        assert!(close(
            fair_band_probability(&BetaParams::uniform(), 0.5).unwrap(),
            1.0,
            1e-12
        ));
    }

    #[test]
    fn map_estimate_serializes_with_status_tag() {
        let json = serde_json::to_value(MapEstimate::Defined { value: 0.5 }).unwrap();
        assert_eq!(json["status"], "defined");
        assert_eq!(json["value"], 0.5);
        let json = serde_json::to_value(MapEstimate::Undefined {
            reason: "flat".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "undefined");
    }
}
