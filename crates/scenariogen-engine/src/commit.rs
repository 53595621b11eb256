use scenariogen_schema::ArtifactKind;
use scenariogen_tags::commit_tags;

/// Commit message for a published artifact.
///
/// ```text
/// Add test cases for `pay.txt` in `test-cases/checkout` folder.
///
/// **Tags**: `@P1`, `@smoke`
///
/// Preview: https://github.com/acme/qa/blob/main/test-cases/checkout/pay.txt
/// ```
///
/// The tags paragraph is left out when there are no tags.
pub fn commit_message(
    kind: ArtifactKind,
    file_name: &str,
    folder: &str,
    tags: &[String],
    preview_url: &str,
) -> String {
    let mut msg = format!("Add {} for `{file_name}` in `{folder}` folder.", kind.label());
    if !tags.is_empty() {
        msg.push_str("\n\n**Tags**: ");
        msg.push_str(&commit_tags(tags));
    }
    msg.push_str("\n\nPreview: ");
    msg.push_str(preview_url);
    msg
}
