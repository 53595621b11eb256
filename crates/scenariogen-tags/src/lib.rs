//! Gherkin tag composition.
//!
//! Users pass a priority tag (`P0`, `@P1`) and a loose list of extra tags
//! (`"smoke, @login regression"`). Both end up on the first line of the
//! scenario file and in the commit message.

/// Splits on any run of commas and whitespace, dropping empty tokens.
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

/// Gives a tag exactly one leading `@`. Returns `None` for tokens that are
/// nothing but `@`s.
pub fn normalize_tag(token: &str) -> Option<String> {
    let bare = token.trim().trim_start_matches('@');
    if bare.is_empty() {
        None
    } else {
        Some(format!("@{bare}"))
    }
}

/// Normalized tags, primary first, then the others in their given order.
/// Repeats are dropped, keeping the first occurrence.
pub fn tag_list(primary: Option<&str>, others: Option<&str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let tokens = primary
        .into_iter()
        .chain(others)
        .flat_map(split_tags)
        .filter_map(normalize_tag);

    for tag in tokens {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// The tag line for a scenario file, e.g. `@P0 @smoke @login`.
///
/// Empty when no tags were given; callers then omit the line altogether.
pub fn compose(primary: Option<&str>, others: Option<&str>) -> String {
    tag_list(primary, others).join(" ")
}

/// Tags as rendered in a commit message: `` `@P0`, `@smoke` ``.
pub fn commit_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("`{t}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
