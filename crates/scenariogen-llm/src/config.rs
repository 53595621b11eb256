use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which wire protocol the backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Generative Language API (`models/*:generateContent`).
    #[default]
    Gemini,
    /// OpenAI chat completions and compatible servers.
    OpenAi,
}

impl LlmProvider {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.0-flash",
            LlmProvider::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => write!(f, "gemini"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "openai-compatible" => Ok(LlmProvider::OpenAi),
            other => anyhow::bail!("unknown LLM provider {other:?} (expected gemini or openai)"),
        }
    }
}

/// Configuration for the generation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// API base (Gemini) or full chat completions URL (OpenAI).
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Temperature for generation (default: 0.2)
    pub temperature: f64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Defaults for `provider` with no API key set.
    pub fn for_provider(provider: LlmProvider) -> Self {
        Self {
            provider,
            endpoint: provider.default_endpoint().to_string(),
            api_key: String::new(),
            model: provider.default_model().to_string(),
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::for_provider(LlmProvider::default())
    }
}
