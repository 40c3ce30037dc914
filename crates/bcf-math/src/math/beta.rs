//! Beta distribution utilities for Bayesian updates.
//!
//! Provides PDF, CDF, survival and inverse CDF, plus mean/variance/mode
//! helpers. The CDF uses the regularized incomplete beta function with
//! a continued-fraction expansion evaluated by the modified Lentz method.
//!
//! # Tolerances
//!
//! - The continued fraction stops once a step changes the result by less
//!   than a relative `1e-14`, or after 10 000 steps.
//! - [`beta_inv_cdf`] bisects on ln(x) until `|CDF(x) - p| < 1e-12` or the
//!   bracket is narrower than `1e-15` relative to the current estimate.
//!
//! All kernels return NaN on invalid parameters instead of failing; callers
//! validate at their own boundary.

use super::stable::log_beta;

const BETACF_MAX_ITERS: usize = 10_000;
const BETACF_EPS: f64 = 1.0e-14;
const BETACF_FPMIN: f64 = 1.0e-300;

const INV_CDF_MAX_ITERS: usize = 200;
const INV_CDF_PROB_TOL: f64 = 1.0e-12;
const INV_CDF_X_TOL: f64 = 1.0e-15;
const INV_CDF_X_FLOOR: f64 = f64::MIN_POSITIVE;

fn invalid_shape(alpha: f64, beta: f64) -> bool {
    !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0
}

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if invalid_shape(alpha, beta) {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if invalid_shape(alpha, beta) {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Mode of Beta(alpha, beta) = (alpha - 1) / (alpha + beta - 2).
///
/// Returns `None` when the density has no single finite maximum: either
/// shape below 1 (density unbounded at a boundary) or the flat Beta(1, 1).
/// A shape of exactly 1 on one side puts the mode on that boundary, e.g.
/// Beta(11, 1) peaks at 1.0.
pub fn beta_mode(alpha: f64, beta: f64) -> Option<f64> {
    if invalid_shape(alpha, beta) {
        return None;
    }
    if alpha < 1.0 || beta < 1.0 {
        return None;
    }
    if alpha == 1.0 && beta == 1.0 {
        return None;
    }
    Some((alpha - 1.0) / (alpha + beta - 2.0))
}

/// Log of the Beta PDF at x.
pub fn log_beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || invalid_shape(alpha, beta) {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        if alpha < 1.0 {
            return f64::INFINITY;
        }
        if alpha > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(1.0, beta);
    }
    if x == 1.0 {
        if beta < 1.0 {
            return f64::INFINITY;
        }
        if beta > 1.0 {
            return f64::NEG_INFINITY;
        }
        return -log_beta(alpha, 1.0);
    }
    let log_x = x.ln();
    let log_one_minus = (-x).ln_1p();
    (alpha - 1.0) * log_x + (beta - 1.0) * log_one_minus - log_beta(alpha, beta)
}

/// Beta PDF at x.
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    let log_pdf = log_beta_pdf(x, alpha, beta);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    if log_pdf == f64::INFINITY {
        return f64::INFINITY;
    }
    if log_pdf == f64::NEG_INFINITY {
        return 0.0;
    }
    log_pdf.exp()
}

/// Regularized incomplete beta function I_x(a,b), the CDF of Beta(a, b).
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || invalid_shape(alpha, beta) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    regularized_incomplete_beta(x, alpha, beta)
}

/// Survival function P(X > x) for X ~ Beta(a, b).
///
/// Evaluated as I_{1-x}(b, a) rather than `1 - beta_cdf`, which keeps
/// precision when the CDF is close to 1.
pub fn beta_sf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || invalid_shape(alpha, beta) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    if x >= 1.0 {
        return 0.0;
    }
    regularized_incomplete_beta(1.0 - x, beta, alpha)
}

/// Inverse CDF (quantile) for Beta(alpha, beta).
///
/// Bisects on ln(x) over `[f64::MIN_POSITIVE, 1]`: a small shape puts the
/// lower tail many decades below 1, out of reach of a linear bracket. A
/// quantile below the smallest normal f64 is returned as 0.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || invalid_shape(alpha, beta) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let floor_cdf = beta_cdf(INV_CDF_X_FLOOR, alpha, beta);
    if floor_cdf.is_nan() {
        return f64::NAN;
    }
    if floor_cdf >= p {
        return 0.0;
    }

    let mut ln_low = INV_CDF_X_FLOOR.ln();
    let mut ln_high = 0.0_f64;
    let mut mid = 0.5;
    for _ in 0..INV_CDF_MAX_ITERS {
        let ln_mid = 0.5 * (ln_low + ln_high);
        mid = ln_mid.exp();
        let cdf = beta_cdf(mid, alpha, beta);
        if cdf.is_nan() {
            return f64::NAN;
        }
        let delta = cdf - p;
        let width = ln_high.exp() - ln_low.exp();
        if delta.abs() < INV_CDF_PROB_TOL || width <= INV_CDF_X_TOL * mid {
            return mid;
        }
        if delta < 0.0 {
            ln_low = ln_mid;
        } else {
            ln_high = ln_mid;
        }
    }
    mid
}

fn regularized_incomplete_beta(x: f64, alpha: f64, beta: f64) -> f64 {
    let ln_front = alpha * x.ln() + beta * (-x).ln_1p() - log_beta(alpha, beta);
    let front = ln_front.exp();
    let threshold = (alpha + 1.0) / (alpha + beta + 2.0);
    let value = if x < threshold {
        front * betacf(alpha, beta, x) / alpha
    } else {
        1.0 - front * betacf(beta, alpha, 1.0 - x) / beta
    };
    value.clamp(0.0, 1.0)
}

fn betacf(alpha: f64, beta: f64, x: f64) -> f64 {
    let qab = alpha + beta;
    let qap = alpha + 1.0;
    let qam = alpha - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        // Even step.
        let aa = m_f * (beta - m_f) * x / ((qam + m2) * (alpha + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step.
        let aa = -(alpha + m_f) * (qab + m_f) * x / ((alpha + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}
