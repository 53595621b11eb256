//! Prompt construction.
//!
//! The formatting rules spelled out here are the same ones
//! `scenariogen-clean` enforces afterwards: plain text, no fences, no
//! numbered scenario headers. Change one, change the other.

use scenariogen_schema::{ArtifactKind, GenerationRequest};

const DOMAIN: &str = "a food delivery application";

/// System instruction sent alongside every user prompt of this kind.
pub fn system_prompt(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::ScenarioSet => {
            "You are a senior QA engineer. You write precise, executable Gherkin scenarios and reply with the Gherkin text only."
        }
        ArtifactKind::TestCode => {
            "You are a senior mobile engineer. You write headless Flutter tests in Dart and reply with source code only."
        }
    }
}

fn persona(kind: ArtifactKind, product: Option<&str>) -> String {
    let app = match product {
        Some(name) => format!("{DOMAIN} called '{name}'"),
        None => DOMAIN.to_string(),
    };
    match kind {
        ArtifactKind::ScenarioSet => format!("You are writing functional test cases for {app}."),
        ArtifactKind::TestCode => format!("You are writing headless Flutter tests for {app}."),
    }
}

fn format_rules(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::ScenarioSet => {
            r#"Write the test cases as clean Gherkin:
- Start with a single "Feature:" line.
- Label every scenario "Scenario:" or "Scenario Outline:" without any number.
- Use Given, When, Then and And steps.
- Cover the happy path, validation errors and edge cases.
- Output plain text only. No markdown, no code fences, no bold text, no headings."#
        }
        ArtifactKind::TestCode => {
            r#"Write a single Dart test file:
- The code must be valid Dart and run with `flutter test`.
- Use package:flutter_test and testWidgets for UI flows.
- Give every test a descriptive name.
- Output the source code only. No markdown, no code fences, no explanations."#
        }
    }
}

/// Builds the user prompt for a generation request.
///
/// The requirement is embedded verbatim. The background names the product
/// and is repeated as its own labeled line; additional context is appended
/// only when present.
pub fn build(request: &GenerationRequest) -> String {
    let background = request.background.as_deref();
    let mut out = persona(request.kind, background);
    out.push_str("\n\n");
    out.push_str(&format!("Requirement: {}\n", request.requirement));
    if let Some(bg) = background {
        out.push_str(&format!("Background: {bg}\n"));
    }
    if let Some(extra) = request.additional_context.as_deref() {
        out.push_str(&format!("Additional context: {extra}\n"));
    }
    out.push('\n');
    out.push_str(format_rules(request.kind));
    out
}

/// Builds the prompt that turns an already cleaned scenario set into
/// headless test code. The scenarios are embedded verbatim; background and
/// additional context get the same labeled lines as in [`build`].
pub fn build_conversion(
    scenarios: &str,
    background: Option<&str>,
    additional_context: Option<&str>,
) -> String {
    let mut out = persona(ArtifactKind::TestCode, background);
    out.push_str("\n\n");
    out.push_str(
        "Convert the following Gherkin scenarios into headless Flutter test code. \
         Write one test per scenario and keep the scenario names as test names.\n",
    );
    if let Some(bg) = background {
        out.push_str(&format!("Background: {bg}\n"));
    }
    if let Some(extra) = additional_context {
        out.push_str(&format!("Additional context: {extra}\n"));
    }
    out.push_str(&format!("\nScenarios:\n{}\n\n", scenarios.trim()));
    out.push_str(format_rules(ArtifactKind::TestCode));
    out
}
