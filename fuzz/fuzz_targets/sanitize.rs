//! Fuzz harness for file and folder name sanitizing

#![no_main]

use libfuzzer_sys::fuzz_target;
use scenariogen_sanitize::{is_slug, sanitize};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let slug = sanitize(&text);
    assert!(slug.is_empty() || is_slug(&slug));
    assert_eq!(sanitize(&slug), slug);
});
