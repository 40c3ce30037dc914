//! Bayesian coin flip estimator.
//!
//! Simulates flips of a biased coin, updates a Beta prior with the observed
//! counts and summarizes the posterior. The `bcf` binary wraps this library.

pub mod estimator;
pub mod exit_codes;
pub mod logging;
pub mod report;
pub mod schema;

pub use estimator::{Estimate, EstimatorParams, PosteriorEstimator};
pub use exit_codes::ExitCode;
pub use report::PosteriorReport;
