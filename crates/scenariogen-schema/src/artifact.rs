use serde::{Deserialize, Serialize};
use std::fmt;

/// What a run produces.
///
/// Both kinds share one pipeline; the kind decides the prompt template,
/// the cleaning rules and where the file lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Gherkin behavioral scenarios.
    ScenarioSet,
    /// Headless integration test code.
    TestCode,
}

impl ArtifactKind {
    /// Top-level output directory, used both locally and in the remote repo.
    pub fn root_dir(&self) -> &'static str {
        match self {
            ArtifactKind::ScenarioSet => "test-cases",
            ArtifactKind::TestCode => "headless-test",
        }
    }

    pub fn extension(&self) -> &'static str {
        "txt"
    }

    /// Human label used in commit messages and console output.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::ScenarioSet => "test cases",
            ArtifactKind::TestCode => "headless test",
        }
    }

    /// Gherkin files start with a tag line; code files would not compile with one.
    pub fn carries_tag_line(&self) -> bool {
        matches!(self, ArtifactKind::ScenarioSet)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::ScenarioSet => write!(f, "scenario_set"),
            ArtifactKind::TestCode => write!(f, "test_code"),
        }
    }
}

/// Generated text after cleanup, plus the tags requested for it.
///
/// Invariant: `text` holds no markdown fences and no numbered scenario headers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedArtifact {
    pub kind: ArtifactKind,
    pub text: String,
    /// Normalized tags, each with exactly one leading `@`.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CleanedArtifact {
    pub fn new(kind: ArtifactKind, text: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            tags,
        }
    }

    /// File content: `<tags>\n\n<text>` when a tag line applies, else just the text.
    pub fn render(&self) -> String {
        if self.tags.is_empty() || !self.kind.carries_tag_line() {
            return self.text.clone();
        }
        format!("{}\n\n{}", self.tags.join(" "), self.text)
    }
}
