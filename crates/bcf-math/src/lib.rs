//! Bayesian coin flip math utilities.

pub mod math;

pub use math::beta::*;
pub use math::conjugate::{self, BetaParams};
pub use math::stable::{log_beta, log_gamma};
