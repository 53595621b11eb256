//! Slug sanitization for scenariogen.
//!
//! Squad names, requirements and file-name overrides all end up as path
//! segments, locally and in the remote repository. `sanitize` is the one
//! place that decides what such a segment may contain.

/// Normalizes free-form text into a path segment.
///
/// Trims, lowercases, drops every character that is not an ASCII letter,
/// digit, `_`, `-` or whitespace, then turns each whitespace run into a
/// single `_`. The result matches `^[a-z0-9_-]*$`. Empty in, empty out.
pub fn sanitize(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            continue;
        }
        if in_space {
            out.push('_');
            in_space = false;
        }
        out.push(c);
    }

    // Whitespace can survive the trim when it sits next to stripped punctuation.
    if in_space {
        out.push('_');
    }

    out
}

/// Like [`sanitize`], but falls back to `sanitize(fallback)` when `name`
/// sanitizes to nothing (e.g. `"!!!"` or an empty override).
pub fn sanitize_or(name: &str, fallback: &str) -> String {
    let slug = sanitize(name);
    if slug.is_empty() {
        sanitize(fallback)
    } else {
        slug
    }
}

/// True when `s` is already a valid, non-empty slug.
pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
