use crate::artifact::ArtifactKind;
use serde::{Deserialize, Serialize};

/// Input to the prompt builder. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: ArtifactKind,
    pub requirement: String,
    pub background: Option<String>,
    pub additional_context: Option<String>,
}

impl GenerationRequest {
    pub fn new(kind: ArtifactKind, requirement: impl Into<String>) -> Self {
        Self {
            kind,
            requirement: requirement.into(),
            background: None,
            additional_context: None,
        }
    }

    /// Blank values are treated as absent.
    pub fn with_background(mut self, background: Option<impl Into<String>>) -> Self {
        self.background = non_blank(background);
        self
    }

    /// Blank values are treated as absent.
    pub fn with_additional_context(mut self, context: Option<impl Into<String>>) -> Self {
        self.additional_context = non_blank(context);
        self
    }
}

fn non_blank(value: Option<impl Into<String>>) -> Option<String> {
    value
        .map(Into::into)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Raw backend output. Untrusted: may contain fences, numbering, prose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationResult {
    pub raw_text: String,
}

impl GenerationResult {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}
