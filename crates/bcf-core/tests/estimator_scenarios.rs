//! Worked examples and properties of the estimator pipeline.

use bcf_common::Error;
use bcf_core::estimator::{
    map_estimate, simulate, summarize, tally, update, EstimatorParams, PosteriorEstimator, Tally,
};
use bcf_math::{beta_cdf, BetaParams};
use proptest::prelude::*;

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn ten_heads_under_uniform_prior() {
    let post = update(&BetaParams::uniform(), Tally::new(10, 0)).unwrap();
    assert_eq!(post, BetaParams { alpha: 11.0, beta: 1.0 });

    let s = summarize(&post, 0.95).unwrap();
    assert!(close(s.mean, 11.0 / 12.0, 1e-12));
    assert_eq!(s.map.value(), Some(1.0));
    assert!(close(s.tail_prob, 1.0 - 0.5f64.powi(11), 1e-12));
    assert!(s.tail_prob > 0.999);
}

#[test]
fn no_data_under_uniform_prior() {
    let post = update(&BetaParams::uniform(), Tally::default()).unwrap();
    let s = summarize(&post, 0.95).unwrap();
    assert!(close(s.mean, 0.5, 1e-12));
    assert!(matches!(map_estimate(&post), Err(Error::NotDefined { .. })));
    assert!(s.map.value().is_none());
}

#[test]
fn balanced_data_under_beta_two_two() {
    let post = update(&BetaParams { alpha: 2.0, beta: 2.0 }, Tally::new(5, 5)).unwrap();
    assert_eq!(post, BetaParams { alpha: 7.0, beta: 7.0 });
    let s = summarize(&post, 0.95).unwrap();
    assert!(close(s.mean, 0.5, 1e-12));
    assert!(close(s.map.value().unwrap(), 0.5, 1e-12));
    assert!(close(s.tail_prob, 0.5, 1e-9));
    // Symmetric posterior, symmetric interval.
    assert!(close(s.interval.low, 1.0 - s.interval.high, 1e-9));
}

#[test]
fn tiny_prior_shape_keeps_interval_mass() {
    // Beta(0.01, 1) after ten tails: the lower 2.5% point sits near 1e-161.
    let post = update(&BetaParams { alpha: 0.01, beta: 1.0 }, Tally::new(0, 10)).unwrap();
    let s = summarize(&post, 0.95).unwrap();
    let (a, b) = (post.alpha, post.beta);
    assert!(s.interval.low > 0.0 && s.interval.low < 1e-100, "low={:e}", s.interval.low);
    assert!(close(beta_cdf(s.interval.low, a, b), 0.025, 1e-9));
    let mass = beta_cdf(s.interval.high, a, b) - beta_cdf(s.interval.low, a, b);
    assert!(close(mass, 0.95, 1e-6), "mass={mass}");
}

#[test]
fn estimator_reproduces_with_seed() {
    let params = EstimatorParams {
        flips: 300,
        true_p: 0.65,
        seed: Some(2024),
        mc_samples: 5_000,
        ..EstimatorParams::default()
    };
    let a = PosteriorEstimator::new(params.clone()).unwrap().run().unwrap();
    let b = PosteriorEstimator::new(params).unwrap().run().unwrap();
    assert_eq!(a, b);
}

#[test]
fn posterior_concentrates_near_true_p() {
    let params = EstimatorParams {
        flips: 5_000,
        true_p: 0.7,
        seed: Some(17),
        mc_samples: 0,
        ..EstimatorParams::default()
    };
    let est = PosteriorEstimator::new(params).unwrap().run().unwrap();
    assert!(close(est.summary.mean, 0.7, 0.03), "mean={}", est.summary.mean);
    assert!(est.summary.interval.width() < 0.06);
    assert!(est.summary.tail_prob > 0.999);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tally_adds_up(n in 1u64..400, p in 0.0f64..=1.0, seed in any::<u64>()) {
        let flips = simulate(n, p, Some(seed)).unwrap();
        let t = tally(&flips);
        prop_assert_eq!(t.heads + t.tails, n);
        prop_assert_eq!(flips.len() as u64, n);
    }

    #[test]
    fn update_is_exact(
        a in 0.1f64..50.0,
        b in 0.1f64..50.0,
        h in 0u64..1_000,
        t in 0u64..1_000,
    ) {
        let post = update(&BetaParams { alpha: a, beta: b }, Tally::new(h, t)).unwrap();
        prop_assert_eq!(post.alpha, a + h as f64);
        prop_assert_eq!(post.beta, b + t as f64);
    }

    #[test]
    fn summary_invariants(
        a in 0.2f64..200.0,
        b in 0.2f64..200.0,
        c in 0.5f64..0.99,
    ) {
        let post = BetaParams { alpha: a, beta: b };
        let s = summarize(&post, c).unwrap();
        prop_assert!(s.mean > 0.0 && s.mean < 1.0);
        prop_assert!(s.interval.low <= s.interval.high);
        prop_assert!((0.0..=1.0).contains(&s.interval.low));
        prop_assert!((0.0..=1.0).contains(&s.interval.high));
        let mass = beta_cdf(s.interval.high, a, b) - beta_cdf(s.interval.low, a, b);
        prop_assert!((mass - c).abs() < 1e-6, "mass {} vs {}", mass, c);
        prop_assert!((0.0..=1.0).contains(&s.tail_prob));
    }
}
