//! Bayesian coin flip settings loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for settings.json
//! - Settings resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation
//! - Config snapshots for reports

pub mod load;
pub mod resolve;
pub mod settings;
pub mod snapshot;
pub mod validate;

pub use load::{load_settings, load_settings_from_file, ConfigError, ResolvedSettings};
pub use resolve::{resolve_settings_path, ConfigSource};
pub use settings::{DisplaySettings, PriorSettings, Settings, SimulationSettings, SummarySettings};
pub use snapshot::ConfigSnapshot;
pub use validate::{
    rules, validate_settings, ValidationError, ValidationResult, MAX_FLIPS, MAX_MC_SAMPLES,
    MIN_MC_SAMPLES,
};

/// Schema version for settings files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
