//! Estimator settings file types.
//!
//! Every field has a built-in default, so an empty JSON object is a valid
//! settings file. The defaults reproduce the classic classroom run: fifty
//! flips of a 60% coin under a uniform prior.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Complete settings file (`settings.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub prior: PriorSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub summary: SummarySettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            schema_version: default_schema_version(),
            description: None,
            prior: PriorSettings::default(),
            simulation: SimulationSettings::default(),
            summary: SummarySettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

/// Beta prior shapes: Beta(alpha, beta).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PriorSettings {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for PriorSettings {
    fn default() -> Self {
        PriorSettings {
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

/// Coin flip simulation inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of flips to simulate.
    pub flips: u64,
    /// True P(heads), used only to drive the simulation.
    pub true_p: f64,
    /// Seed for reproducible runs; absent means OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            flips: 50,
            true_p: 0.6,
            seed: None,
        }
    }
}

/// Posterior summary options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SummarySettings {
    /// Credible interval mass, in (0, 1).
    pub confidence: f64,
    /// Half-width of the "roughly fair" band around 0.5.
    pub fair_band: f64,
    /// Monte Carlo posterior draws for the cross-check; 0 disables it.
    pub mc_samples: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        SummarySettings {
            confidence: 0.95,
            fair_band: 0.05,
            mc_samples: 20_000,
        }
    }
}

/// How the flip sequence is printed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DisplaySettings {
    /// Characters per line.
    pub wrap: usize,
    /// Pause between printed flips, in milliseconds.
    pub delay_ms: u64,
    /// Flips printed before the sequence is elided.
    pub max_shown: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            wrap: 80,
            delay_ms: 0,
            max_shown: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.schema_version, crate::CONFIG_SCHEMA_VERSION);
    }

    #[test]
    fn partial_sections_fill_missing_fields() {
        let json = r#"{ "prior": { "alpha": 2.0 }, "simulation": { "seed": 7 } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.prior.alpha, 2.0);
        assert_eq!(settings.prior.beta, 1.0);
        assert_eq!(settings.simulation.seed, Some(7));
        assert_eq!(settings.simulation.flips, 50);
    }

    #[test]
    fn defaults_match_classroom_run() {
        let s = Settings::default();
        assert_eq!(s.simulation.flips, 50);
        assert_eq!(s.simulation.true_p, 0.6);
        assert_eq!(s.summary.confidence, 0.95);
        assert_eq!(s.summary.fair_band, 0.05);
        assert_eq!(s.summary.mc_samples, 20_000);
        assert_eq!(s.display.wrap, 80);
    }

    #[test]
    fn serialize_round_trips_through_json() {
        let mut s = Settings::default();
        s.simulation.seed = Some(42);
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
