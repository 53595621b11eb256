//! Fuzz harness for the output cleaners
//!
//! Whatever the backend sends, cleaning must terminate, be idempotent,
//! and leave no code fences behind.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scenariogen_clean::{clean, clean_code};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let once = clean(text);
        assert_eq!(clean(&once), once);
        assert!(!once.contains("```"));

        let code = clean_code(text);
        assert_eq!(clean_code(&code), code);
        assert!(!code.contains("```"));
    }
});
