//! Fuzz harness for tag composition
//!
//! Input is split at the first NUL into the primary tag and the rest.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scenariogen_tags::{compose, tag_list};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (primary, others) = text.split_once('\0').unwrap_or((text, ""));

    let tags = tag_list(Some(primary), Some(others));
    for tag in &tags {
        assert!(tag.starts_with('@'));
        assert!(!tag.starts_with("@@"));
        assert!(!tag.contains(',') && !tag.contains(char::is_whitespace));
    }
    assert_eq!(compose(Some(primary), Some(others)), tags.join(" "));
});
