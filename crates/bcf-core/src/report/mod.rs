//! Report generation.
//!
//! A [`PosteriorReport`] is the machine-readable form of an [`Estimate`]; the
//! [`human`] module renders the same estimate for a terminal.

pub mod flips;
pub mod human;

pub use flips::{truncated_sequence, write_sequence, SequenceLayout};
pub use human::{percent_label, summary_line, write_human};

use bcf_common::SCHEMA_VERSION;
use bcf_config::ConfigSnapshot;
use bcf_math::BetaParams;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::estimator::{Estimate, MonteCarloCheck, PosteriorSummary};

/// Beta shapes as they appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BetaShape {
    pub alpha: f64,
    pub beta: f64,
}

impl From<BetaParams> for BetaShape {
    fn from(p: BetaParams) -> Self {
        BetaShape {
            alpha: p.alpha,
            beta: p.beta,
        }
    }
}

/// JSON report for one run (`--format json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PosteriorReport {
    pub schema_version: String,
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub seed: Option<u64>,
    /// True P(heads) used to simulate; absent for supplied counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_p: Option<f64>,
    pub flips: u64,
    pub heads: u64,
    pub tails: u64,
    /// H/T sequence, cut after the display limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(default)]
    pub sequence_truncated: bool,
    pub prior: BetaShape,
    pub posterior: BetaShape,
    pub summary: PosteriorSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloCheck>,
    pub config: ConfigSnapshot,
}

impl PosteriorReport {
    pub fn new(
        estimate: &Estimate,
        run_id: impl Into<String>,
        config: ConfigSnapshot,
        max_shown: usize,
    ) -> Self {
        let (sequence, sequence_truncated) = if estimate.flips.is_empty() {
            (None, false)
        } else {
            let (text, cut) = truncated_sequence(&estimate.flips, max_shown);
            (Some(text), cut)
        };

        PosteriorReport {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: run_id.into(),
            generated_at: Utc::now(),
            seed: estimate.seed,
            true_p: estimate.true_p,
            flips: estimate.tally.trials(),
            heads: estimate.tally.heads,
            tails: estimate.tally.tails,
            sequence,
            sequence_truncated,
            prior: estimate.prior.into(),
            posterior: estimate.posterior.into(),
            summary: estimate.summary.clone(),
            monte_carlo: estimate.monte_carlo.clone(),
            config,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
