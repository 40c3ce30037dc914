//! Settings snapshot embedded in reports.
//!
//! Captures which settings file a run used so a printed estimate can be
//! traced back to its inputs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Provenance of the settings used for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSnapshot {
    /// Schema version of the settings.
    pub schema_version: String,

    /// Path the settings were loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// Where the path came from (CLI, environment, XDG, ...).
    pub source: String,

    /// SHA-256 of the settings file content.
    #[serde(default)]
    pub hash: Option<String>,
}
