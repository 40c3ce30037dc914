//! Settings loading with provenance.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::resolve::{resolve_settings_path, ConfigSource};
use crate::settings::Settings;
use crate::snapshot::ConfigSnapshot;
use crate::validate::{validate_settings, ValidationError};

/// Errors that can occur during settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settings file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in settings file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Semantic validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Settings together with where they came from.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: Settings,
    /// Path of the settings file (None when using built-in defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
    /// SHA-256 of the file content (None when using built-in defaults).
    pub hash: Option<String>,
}

impl ResolvedSettings {
    /// Built-in defaults with no file behind them.
    pub fn defaults() -> Self {
        ResolvedSettings {
            settings: Settings::default(),
            path: None,
            source: ConfigSource::BuiltinDefault,
            hash: None,
        }
    }

    /// Create a config snapshot for reports.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            schema_version: self.settings.schema_version.clone(),
            path: self.path.as_ref().map(|p| p.display().to_string()),
            source: self.source.to_string(),
            hash: self.hash.clone(),
        }
    }
}

/// Resolve, read, parse and validate the settings file.
///
/// Falls back to built-in defaults when no file is found along the
/// resolution path. An explicitly named file that does not exist is an error.
pub fn load_settings(cli_path: Option<&Path>) -> Result<ResolvedSettings, ConfigError> {
    let (path, source) = resolve_settings_path(cli_path);
    let Some(path) = path else {
        return Ok(ResolvedSettings::defaults());
    };

    let (settings, hash) = load_settings_from_file(&path)?;
    validate_settings(&settings)?;

    Ok(ResolvedSettings {
        settings,
        path: Some(path),
        source,
        hash: Some(hash),
    })
}

/// Read and parse a settings file, returning it with its content hash.
///
/// Does not run semantic validation.
pub fn load_settings_from_file(path: &Path) -> Result<(Settings, String), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let hash = compute_hash(&content);

    let settings: Settings =
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok((settings, hash))
}

/// SHA-256 of the given content, hex-encoded.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
