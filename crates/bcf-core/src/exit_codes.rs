//! Exit codes for the `bcf` CLI.
//!
//! Exit code ranges:
//! - 0: success
//! - 10-19: user/environment errors (recoverable by user action)
//! - 20-29: internal errors

use bcf_common::{Error, ErrorCategory};

/// Exit codes for `bcf` invocations.
///
/// These codes are a stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report produced.
    Clean = 0,

    /// Invalid arguments or parameter values.
    ArgsError = 10,

    /// Settings file missing, malformed or invalid.
    ConfigError = 11,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// I/O error writing output or reading files.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for an estimator error.
    pub fn for_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Parameter => ExitCode::ArgsError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Io => ExitCode::IoError,
            // An undefined statistic reaching the top level is a bug; reports carry it as a value.
            ErrorCategory::Statistic => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
