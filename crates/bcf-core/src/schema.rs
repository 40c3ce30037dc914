//! JSON Schema generation for settings and report types.
//!
//! ```bash
//! bcf schema --list
//! bcf schema Settings
//! bcf schema PosteriorReport
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::estimator::{CredibleInterval, MapEstimate, MonteCarloCheck, PosteriorSummary};
pub use crate::report::PosteriorReport;
pub use bcf_config::{ConfigSnapshot, Settings};

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Settings", "settings.json file"),
        ("ConfigSnapshot", "Which settings file a run used"),
        ("PosteriorReport", "JSON report of one run"),
        ("PosteriorSummary", "Closed-form posterior statistics"),
        ("CredibleInterval", "Equal-tailed credible interval"),
        ("MapEstimate", "Posterior mode or why it is undefined"),
        ("MonteCarloCheck", "Empirical statistics from posterior draws"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "Settings" => schema_for!(Settings),
        "ConfigSnapshot" => schema_for!(ConfigSnapshot),
        "PosteriorReport" => schema_for!(PosteriorReport),
        "PosteriorSummary" => schema_for!(PosteriorSummary),
        "CredibleInterval" => schema_for!(CredibleInterval),
        "MapEstimate" => schema_for!(MapEstimate),
        "MonteCarloCheck" => schema_for!(MonteCarloCheck),
        _ => return None,
    };
    serde_json::to_value(schema).ok()
}

/// Generate all schemas keyed by type name.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    let mut schemas = BTreeMap::new();
    for (name, _desc) in available_schemas() {
        if let Some(schema) = generate_schema(name) {
            schemas.insert(name.to_string(), schema);
        }
    }
    schemas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_schema_generates() {
        for (name, _) in available_schemas() {
            let schema = generate_schema(name).unwrap_or_else(|| panic!("no schema for {name}"));
            assert!(schema.is_object(), "{name}");
        }
        assert_eq!(generate_all_schemas().len(), available_schemas().len());
    }

    #[test]
    fn unknown_schema_is_none() {
        assert!(generate_schema("Plan").is_none());
    }

    #[test]
    fn report_schema_names_core_fields() {
        let schema = generate_schema("PosteriorReport").unwrap();
        let props = &schema["properties"];
        for field in ["run_id", "generated_at", "posterior", "summary", "config"] {
            assert!(props.get(field).is_some(), "missing {field}");
        }
    }
}
