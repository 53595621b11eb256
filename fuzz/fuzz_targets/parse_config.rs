//! Fuzz harness for defaults files (scenariogen.yaml / .json)
//!
//! Parsing and resolving arbitrary input must fail cleanly, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scenariogen_config::{AppConfig, ConfigFormat, parse_file_config};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for format in [ConfigFormat::Yaml, ConfigFormat::Json] {
        if let Ok(cfg) = parse_file_config(input, format) {
            let _ = AppConfig::resolve(&cfg, |_| None);
        }
    }
});
