//! Posterior estimation pipeline.
//!
//! Simulate flips, tally them, update the Beta prior and summarize:
//!
//! ```text
//! simulate(n, p_true, seed) ─► tally ─► update(prior) ─► summarize(confidence)
//!                                                      └─► Monte Carlo check
//! ```
//!
//! [`PosteriorEstimator`] owns the random source for a run, so the flips and
//! the Monte Carlo draws come from one seeded stream and a seed reproduces the
//! whole report.

pub mod flips;
pub mod monte_carlo;
pub mod posterior;

pub use flips::{make_rng, simulate, tally, Flip, Tally};
pub use monte_carlo::{cross_check, empirical_quantile, MonteCarloCheck};
pub use posterior::{
    fair_band_probability, map_estimate, prior_from_shapes, summarize, update, CredibleInterval,
    FairBand, MapEstimate, PosteriorSummary, FAIR_POINT,
};

use bcf_common::{Error, Result};
use bcf_config::{rules, Settings};
use bcf_math::BetaParams;
use rand::rngs::StdRng;
use tracing::debug;

/// Inputs for one estimator run.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorParams {
    pub flips: u64,
    pub true_p: f64,
    pub prior: BetaParams,
    pub seed: Option<u64>,
    pub confidence: f64,
    pub fair_band: f64,
    /// Monte Carlo draws; 0 skips the cross-check.
    pub mc_samples: u64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl EstimatorParams {
    pub fn from_settings(settings: &Settings) -> Self {
        EstimatorParams {
            flips: settings.simulation.flips,
            true_p: settings.simulation.true_p,
            prior: BetaParams {
                alpha: settings.prior.alpha,
                beta: settings.prior.beta,
            },
            seed: settings.simulation.seed,
            confidence: settings.summary.confidence,
            fair_band: settings.summary.fair_band,
            mc_samples: settings.summary.mc_samples,
        }
    }

    /// Check everything except the simulation inputs, which only [`PosteriorEstimator::run`] needs.
    pub fn validate(&self) -> Result<()> {
        prior_from_shapes(self.prior.alpha, self.prior.beta)?;
        posterior::validate_confidence(self.confidence)?;
        posterior::validate_fair_band(self.fair_band)?;
        rules::mc_samples(self.mc_samples).map_err(|m| Error::invalid("mc_samples", m))
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub seed: Option<u64>,
    /// True P(heads); None when the counts were supplied directly.
    pub true_p: Option<f64>,
    pub flips: Vec<Flip>,
    pub tally: Tally,
    pub prior: BetaParams,
    pub posterior: BetaParams,
    pub summary: PosteriorSummary,
    pub monte_carlo: Option<MonteCarloCheck>,
}

/// Runs the simulate, update, summarize pipeline with one owned random source.
#[derive(Debug)]
pub struct PosteriorEstimator {
    params: EstimatorParams,
    rng: StdRng,
}

impl PosteriorEstimator {
    pub fn new(params: EstimatorParams) -> Result<Self> {
        params.validate()?;
        let rng = make_rng(params.seed);
        Ok(PosteriorEstimator { params, rng })
    }

    /// Simulate the configured flips and summarize the resulting posterior.
    pub fn run(&mut self) -> Result<Estimate> {
        let EstimatorParams { flips, true_p, .. } = self.params;
        flips::validate_trials(flips, true_p)?;

        let outcomes = flips::draw_flips(&mut self.rng, flips, true_p);
        let counts = tally(&outcomes);
        debug!(
            flips,
            heads = counts.heads,
            tails = counts.tails,
            "simulated flips"
        );

        let mut estimate = self.estimate_from_counts(counts)?;
        estimate.true_p = Some(true_p);
        estimate.flips = outcomes;
        Ok(estimate)
    }

    /// Summarize the posterior for counts observed elsewhere.
    pub fn estimate_from_counts(&mut self, counts: Tally) -> Result<Estimate> {
        let posterior = update(&self.params.prior, counts)?;
        debug!(prior = %self.params.prior, posterior = %posterior, "posterior updated");

        let summary = summarize(&posterior, self.params.confidence)?
            .with_fair_band(&posterior, self.params.fair_band)?;

        let monte_carlo = if self.params.mc_samples > 0 {
            let check = cross_check(
                &mut self.rng,
                &posterior,
                self.params.mc_samples,
                self.params.confidence,
                self.params.fair_band,
            )?;
            debug!(samples = check.samples, tail_prob = check.tail_prob, "monte carlo check done");
            Some(check)
        } else {
            None
        };

        Ok(Estimate {
            seed: self.params.seed,
            true_p: None,
            flips: Vec::new(),
            tally: counts,
            prior: self.params.prior,
            posterior,
            summary,
            monte_carlo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(flips: u64, true_p: f64, seed: u64) -> EstimatorParams {
        EstimatorParams {
            flips,
            true_p,
            seed: Some(seed),
            mc_samples: 0,
            ..EstimatorParams::default()
        }
    }

    #[test]
    fn defaults_come_from_settings() {
        let p = EstimatorParams::default();
        assert_eq!(p.flips, 50);
        assert_eq!(p.prior, BetaParams::uniform());
        assert_eq!(p.mc_samples, 20_000);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn run_is_reproducible() {
        let a = PosteriorEstimator::new(params(100, 0.6, 42)).unwrap().run().unwrap();
        let b = PosteriorEstimator::new(params(100, 0.6, 42)).unwrap().run().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn run_matches_standalone_simulate() {
        let est = PosteriorEstimator::new(params(64, 0.3, 5)).unwrap().run().unwrap();
        assert_eq!(est.flips, simulate(64, 0.3, Some(5)).unwrap());
    }

    #[test]
    fn run_posterior_counts_add_up() {
        let est = PosteriorEstimator::new(params(250, 0.7, 8)).unwrap().run().unwrap();
        assert_eq!(est.tally.trials(), 250);
        assert_eq!(est.posterior.alpha, 1.0 + est.tally.heads as f64);
        assert_eq!(est.posterior.beta, 1.0 + est.tally.tails as f64);
        assert_eq!(est.true_p, Some(0.7));
        assert!(est.summary.fair_band.is_some());
        assert!(est.monte_carlo.is_none());
    }

    #[test]
    fn run_with_monte_carlo() {
        let mut p = params(80, 0.5, 3);
        p.mc_samples = 5_000;
        let est = PosteriorEstimator::new(p).unwrap().run().unwrap();
        let mc = est.monte_carlo.expect("cross-check enabled");
        assert_eq!(mc.samples, 5_000);
        assert!((mc.mean - est.summary.mean).abs() < 0.02);
    }

    #[test]
    fn rejects_small_mc_sample_counts() {
        let mut p = params(10, 0.5, 1);
        p.mc_samples = 10;
        let err = PosteriorEstimator::new(p).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "mc_samples", .. }));
    }

    #[test]
    fn run_rejects_zero_flips() {
        let mut est = PosteriorEstimator::new(params(0, 0.5, 1)).unwrap();
        assert!(matches!(
            est.run().unwrap_err(),
            Error::InvalidParameter { name: "flips", .. }
        ));
    }

    #[test]
    fn oversized_runs_are_rejected_before_allocating() {
        let mut p = params(bcf_config::MAX_FLIPS + 1, 0.5, 1);
        let mut est = PosteriorEstimator::new(p.clone()).unwrap();
        assert!(matches!(
            est.run().unwrap_err(),
            Error::InvalidParameter { name: "flips", .. }
        ));

        p.flips = 10;
        p.mc_samples = u64::MAX;
        assert!(matches!(
            PosteriorEstimator::new(p).unwrap_err(),
            Error::InvalidParameter { name: "mc_samples", .. }
        ));
    }

    #[test]
    fn counts_without_simulation() {
        let mut p = params(1, 0.5, 1);
        p.prior = BetaParams { alpha: 2.0, beta: 2.0 };
        let est = PosteriorEstimator::new(p)
            .unwrap()
            .estimate_from_counts(Tally::new(5, 5))
            .unwrap();
        assert!(est.flips.is_empty());
        assert_eq!(est.true_p, None);
        assert_eq!(est.posterior, BetaParams { alpha: 7.0, beta: 7.0 });
    }
}
