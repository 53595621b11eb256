//! Cleanup of raw generated text.
//!
//! Backends are told not to emit markdown, and regularly do anyway. The
//! functions here turn whatever came back into plain Gherkin or plain code.
//! They never fail and never check that the result is valid Gherkin.

use regex::Regex;
use scenariogen_schema::ArtifactKind;
use std::sync::LazyLock;

/// `**Scenario 2: Checkout with coupon**` style headers, bold markers included.
static BOLD_SCENARIO_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Scenario\s*\d*.*\*\*").expect("valid regex"));

static GHERKIN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```gherkin").expect("valid regex"));

static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```").expect("valid regex"));

static NUMBERED_SCENARIO_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Scenario\s*\d*:").expect("valid regex"));

/// Any fence together with its language tag (```dart, ```, ```c++).
static TAGGED_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+.\-]*").expect("valid regex"));

fn clean_scenarios_once(text: &str) -> String {
    let text = BOLD_SCENARIO_HEADER.replace_all(text, "");
    let text = GHERKIN_FENCE.replace_all(&text, "");
    let text = FENCE.replace_all(&text, "");
    let text = NUMBERED_SCENARIO_LABEL.replace_all(&text, "Scenario:");
    text.trim().to_string()
}

fn clean_code_once(text: &str) -> String {
    TAGGED_FENCE.replace_all(text, "").trim().to_string()
}

/// Every pass that changes the text makes it strictly shorter, so this terminates.
fn until_stable(text: &str, pass: fn(&str) -> String) -> String {
    let mut current = pass(text);
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Cleans a generated scenario set.
///
/// In order: drop bold `**Scenario N…**` headers, drop ```` ```gherkin ````
/// openers (any case), drop remaining fences, rewrite `Scenario N:` to
/// `Scenario:`, trim. Passes repeat until the text stops changing, so a
/// fence removal cannot leave behind a header the first step already
/// walked past. `clean(clean(x)) == clean(x)`.
pub fn clean(raw: &str) -> String {
    until_stable(raw, clean_scenarios_once)
}

/// Cleans generated test code: removes fences with their language tag, trims.
pub fn clean_code(raw: &str) -> String {
    until_stable(raw, clean_code_once)
}

/// Picks the cleanup rules for an artifact kind.
pub fn clean_for(kind: ArtifactKind, raw: &str) -> String {
    match kind {
        ArtifactKind::ScenarioSet => clean(raw),
        ArtifactKind::TestCode => clean_code(raw),
    }
}

/// True when `text` still carries something [`clean`] would remove.
pub fn has_generation_artifacts(text: &str) -> bool {
    text.contains("```") || BOLD_SCENARIO_HEADER.is_match(text)
}
