//! Fuzz target for posterior summaries.
//!
//! Any positive shapes and confidence in (0, 1) must give an ordered
//! interval inside [0, 1].

#![no_main]

use arbitrary::Arbitrary;
use bcf_core::estimator::summarize;
use bcf_math::BetaParams;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    alpha: f64,
    beta: f64,
    confidence: f64,
}

fuzz_target!(|input: Input| {
    let posterior = BetaParams {
        alpha: input.alpha,
        beta: input.beta,
    };
    if let Ok(summary) = summarize(&posterior, input.confidence) {
        assert!(summary.interval.low <= summary.interval.high);
        assert!((0.0..=1.0).contains(&summary.interval.low));
        assert!((0.0..=1.0).contains(&summary.interval.high));
    }
});
