//! Fuzz target for settings.json parsing and validation.
//!
//! Arbitrary input must only ever produce an error, never a panic.

#![no_main]

use bcf_config::{validate_settings, Settings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(settings) = serde_json::from_slice::<Settings>(data) {
        let _ = validate_settings(&settings);
    }
});
