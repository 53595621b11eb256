use anyhow::{Context, Result};
use scenariogen_logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration format types supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    #[default]
    Yaml,
}

impl ConfigFormat {
    /// `.json` is JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Defaults file. Every field is optional; the environment wins over it.
///
/// Credentials are not read from here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_root: Option<PathBuf>,
    pub llm: LlmSection,
    pub github: GithubSection,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmSection {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub temperature: Option<f64>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubSection {
    /// `false` turns publishing off, like `NO_UPLOAD=true`.
    pub upload: Option<bool>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub api_base: Option<String>,
    pub web_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Parses defaults-file text. Blank input is an empty config.
pub fn parse_file_config(contents: &str, format: ConfigFormat) -> Result<FileConfig> {
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    match format {
        ConfigFormat::Json => serde_json::from_str(contents).context("Failed to parse JSON config"),
        ConfigFormat::Yaml => serde_yaml::from_str(contents).context("Failed to parse YAML config"),
    }
}

/// Load a defaults file; the format follows the extension.
pub fn load_file_config(path: impl AsRef<Path>) -> Result<FileConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    parse_file_config(&contents, ConfigFormat::from_path(path))
        .with_context(|| format!("in {}", path.display()))
}
