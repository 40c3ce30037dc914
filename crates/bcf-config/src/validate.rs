//! Settings validation errors and semantic validation.

use thiserror::Error;

use crate::settings::Settings;

/// Fewest Monte Carlo draws accepted for the cross-check.
pub const MIN_MC_SAMPLES: u64 = 5_000;

/// Most Monte Carlo draws accepted. Draws are held in memory to be sorted.
pub const MAX_MC_SAMPLES: u64 = 10_000_000;

/// Most flips accepted in one simulated run. The sequence is held in memory.
pub const MAX_FLIPS: u64 = 100_000_000;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    /// Dotted path of the offending field, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::InvalidValue { field, .. } => Some(field),
            ValidationError::VersionMismatch { .. } => None,
        }
    }
}

fn invalid(field: &'static str, message: String) -> ValidationError {
    ValidationError::InvalidValue { field, message }
}

/// Range rules shared by settings validation and the estimator.
///
/// Each rule returns the failure message without a field name; callers attach
/// a dotted settings path or a CLI parameter name.
pub mod rules {
    use super::{MAX_FLIPS, MAX_MC_SAMPLES, MIN_MC_SAMPLES};

    pub type RuleResult = Result<(), String>;

    /// Beta shape parameter: finite and > 0.
    pub fn shape(value: f64) -> RuleResult {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("must be a finite number > 0, got {value}"));
        }
        Ok(())
    }

    pub fn flips(n: u64) -> RuleResult {
        if n == 0 || n > MAX_FLIPS {
            return Err(format!("must be within [1, {MAX_FLIPS}], got {n}"));
        }
        Ok(())
    }

    /// True P(heads), inclusive of both ends.
    pub fn true_p(p: f64) -> RuleResult {
        if !(0.0..=1.0).contains(&p) {
            return Err(format!("must be within [0, 1], got {p}"));
        }
        Ok(())
    }

    pub fn confidence(c: f64) -> RuleResult {
        if !(c > 0.0 && c < 1.0) {
            return Err(format!("must be within (0, 1), got {c}"));
        }
        Ok(())
    }

    pub fn fair_band(eps: f64) -> RuleResult {
        if !(eps > 0.0 && eps <= 0.5) {
            return Err(format!("must be within (0, 0.5], got {eps}"));
        }
        Ok(())
    }

    /// Monte Carlo draw count. Zero disables the cross-check.
    pub fn mc_samples(n: u64) -> RuleResult {
        if n != 0 && !(MIN_MC_SAMPLES..=MAX_MC_SAMPLES).contains(&n) {
            return Err(format!(
                "must be 0 (disabled) or within [{MIN_MC_SAMPLES}, {MAX_MC_SAMPLES}], got {n}"
            ));
        }
        Ok(())
    }
}

fn check(field: &'static str, rule: rules::RuleResult) -> ValidationResult<()> {
    rule.map_err(|message| invalid(field, message))
}

/// Validate settings semantically.
///
/// Checks run in file order and stop at the first failure.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    check("prior.alpha", rules::shape(settings.prior.alpha))?;
    check("prior.beta", rules::shape(settings.prior.beta))?;
    check("simulation.flips", rules::flips(settings.simulation.flips))?;
    check("simulation.true_p", rules::true_p(settings.simulation.true_p))?;
    check("summary.confidence", rules::confidence(settings.summary.confidence))?;
    check("summary.fair_band", rules::fair_band(settings.summary.fair_band))?;
    check("summary.mc_samples", rules::mc_samples(settings.summary.mc_samples))?;

    if settings.display.wrap == 0 {
        return Err(invalid("display.wrap", "must be positive, got 0".into()));
    }

    Ok(())
}
