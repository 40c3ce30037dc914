//! Structured event vocabulary.
//!
//! Every event carries the run ID and a pipeline stage so JSONL logs from
//! one invocation can be grouped and filtered.

use serde::{Deserialize, Serialize};

/// Stages of the estimator pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and settings resolution.
    Init,
    /// Drawing the flips.
    Simulate,
    /// Conjugate update of the prior.
    Update,
    /// Closed-form and Monte Carlo statistics.
    Summarize,
    /// Rendering output.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Simulate => "simulate",
            Stage::Update => "update",
            Stage::Summarize => "summarize",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const SIMULATE_FINISHED: &str = "simulate.finished";
    pub const UPDATE_FINISHED: &str = "update.finished";
    pub const SUMMARIZE_FINISHED: &str = "summarize.finished";
    pub const SUMMARIZE_MAP_UNDEFINED: &str = "summarize.map_undefined";
    pub const REPORT_WRITTEN: &str = "report.written";

    pub const RUN_FAILED: &str = "run.failed";
}

/// Correlation data attached to every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
        }
    }
}
