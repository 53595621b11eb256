//! Configuration for scenariogen.
//!
//! Values come from, lowest precedence first: built-in defaults, an
//! optional defaults file ([`load_file_config`]), then the environment.
//! Command-line flags are applied on top by the binary. The result is a
//! plain [`AppConfig`] value handed to the engine; nothing downstream
//! reads the environment.

mod file;

pub use file::{
    ConfigFormat, FileConfig, GithubSection, LlmSection, load_file_config, parse_file_config,
};

use scenariogen_error::PipelineError;
use scenariogen_llm::{LlmConfig, LlmProvider};
use scenariogen_logging::LoggingConfig;
use scenariogen_publish_github::{
    DEFAULT_API_BASE, DEFAULT_BRANCH, DEFAULT_WEB_BASE, GithubPublisher,
};
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_LLM_API_KEY: &str = "SCENARIOGEN_LLM_API_KEY";
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_LLM_PROVIDER: &str = "SCENARIOGEN_LLM_PROVIDER";
pub const ENV_LLM_MODEL: &str = "SCENARIOGEN_LLM_MODEL";
pub const ENV_LLM_ENDPOINT: &str = "SCENARIOGEN_LLM_ENDPOINT";
pub const ENV_LLM_TEMPERATURE: &str = "SCENARIOGEN_LLM_TEMPERATURE";
pub const ENV_LLM_TIMEOUT_SECS: &str = "SCENARIOGEN_LLM_TIMEOUT_SECS";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_OWNER: &str = "GITHUB_REPO_OWNER";
pub const ENV_GITHUB_REPO: &str = "GITHUB_REPO_NAME";
pub const ENV_GITHUB_BRANCH: &str = "GITHUB_BRANCH";
pub const ENV_GITHUB_API_BASE: &str = "GITHUB_API_BASE";
pub const ENV_NO_UPLOAD: &str = "NO_UPLOAD";

/// Truthy values: "1", "true", "yes", "on" (any case, surrounding whitespace ignored).
pub fn parse_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Backend settings before the key has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let llm = LlmConfig::default();
        Self {
            provider: llm.provider,
            api_key: None,
            model: llm.model,
            endpoint: llm.endpoint,
            temperature: llm.temperature,
            timeout_secs: llm.timeout_secs,
        }
    }
}

impl GenerationConfig {
    /// Env var a user should set when the key is missing.
    fn key_var(&self) -> &'static str {
        match self.provider {
            LlmProvider::Gemini => ENV_GOOGLE_API_KEY,
            LlmProvider::OpenAi => ENV_OPENAI_API_KEY,
        }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(PipelineError::configuration(format!(
                "{} is not set (or set {ENV_LLM_API_KEY})",
                self.key_var()
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PipelineError::configuration(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }
        if self.timeout_secs == 0 {
            return Err(PipelineError::configuration("LLM timeout must be at least 1 second"));
        }
        Ok(())
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            provider: self.provider,
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            model: self.model.clone(),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Where and whether artifacts are committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub enabled: bool,
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: String,
    pub api_base: String,
    pub web_base: String,
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: None,
            owner: None,
            repo: None,
            branch: DEFAULT_BRANCH.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl PublishConfig {
    /// Only an enabled publisher needs credentials.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.enabled {
            return Ok(());
        }
        let missing: Vec<&str> = [
            (ENV_GITHUB_TOKEN, &self.token),
            (ENV_GITHUB_OWNER, &self.owner),
            (ENV_GITHUB_REPO, &self.repo),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(PipelineError::configuration(format!(
                "publishing is enabled but {} not set (set NO_UPLOAD=true to skip publishing)",
                describe_missing(&missing)
            )));
        }
        if self.branch.trim().is_empty() {
            return Err(PipelineError::configuration("GITHUB_BRANCH is empty"));
        }
        Ok(())
    }

    pub fn publisher(&self) -> GithubPublisher {
        let mut p = GithubPublisher::new(
            self.token.clone().unwrap_or_default(),
            self.owner.clone().unwrap_or_default(),
            self.repo.clone().unwrap_or_default(),
        );
        p.branch = self.branch.clone();
        p.api_base = self.api_base.clone();
        p.web_base = self.web_base.clone();
        p.timeout_secs = self.timeout_secs;
        p
    }
}

fn describe_missing(names: &[&str]) -> String {
    match names {
        [one] => format!("{one} is"),
        _ => format!("{} are", names.join(", ")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub publish: PublishConfig,
    /// Directory the `test-cases/` and `headless-test/` trees live under.
    pub output_root: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            publish: PublishConfig::default(),
            output_root: PathBuf::from("."),
            logging: LoggingConfig::default(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T, PipelineError> {
    raw.trim()
        .parse()
        .map_err(|_| PipelineError::configuration(format!("{name}={raw:?} is not a valid value")))
}

impl AppConfig {
    /// Layers `lookup` (usually the process environment) over `file` over defaults.
    ///
    /// Blank variables count as unset. Fails only on values that do not parse;
    /// missing credentials are reported by [`AppConfig::validate`].
    pub fn resolve<F>(file: &FileConfig, lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider = match var(ENV_LLM_PROVIDER).or_else(|| file.llm.provider.clone()) {
            Some(raw) => LlmProvider::from_str(&raw)
                .map_err(|e| PipelineError::configuration(format!("{e:#}")))?,
            None => LlmProvider::default(),
        };
        let defaults = LlmConfig::for_provider(provider);

        let provider_key = match provider {
            LlmProvider::Gemini => ENV_GOOGLE_API_KEY,
            LlmProvider::OpenAi => ENV_OPENAI_API_KEY,
        };
        let temperature = match var(ENV_LLM_TEMPERATURE) {
            Some(raw) => parse_var(ENV_LLM_TEMPERATURE, &raw)?,
            None => file.llm.temperature.unwrap_or(defaults.temperature),
        };
        let llm_timeout = match var(ENV_LLM_TIMEOUT_SECS) {
            Some(raw) => parse_var(ENV_LLM_TIMEOUT_SECS, &raw)?,
            None => file.llm.timeout_secs.unwrap_or(defaults.timeout_secs),
        };

        let generation = GenerationConfig {
            provider,
            api_key: var(ENV_LLM_API_KEY).or_else(|| var(provider_key)),
            model: var(ENV_LLM_MODEL)
                .or_else(|| file.llm.model.clone())
                .unwrap_or(defaults.model),
            endpoint: var(ENV_LLM_ENDPOINT)
                .or_else(|| file.llm.endpoint.clone())
                .unwrap_or(defaults.endpoint),
            temperature,
            timeout_secs: llm_timeout,
        };

        let gh = &file.github;
        let publish_defaults = PublishConfig::default();
        let no_upload = var(ENV_NO_UPLOAD).is_some_and(|v| parse_truthy(&v));
        let publish = PublishConfig {
            enabled: !no_upload && gh.upload.unwrap_or(true),
            token: var(ENV_GITHUB_TOKEN),
            owner: var(ENV_GITHUB_OWNER).or_else(|| gh.owner.clone()),
            repo: var(ENV_GITHUB_REPO).or_else(|| gh.repo.clone()),
            branch: var(ENV_GITHUB_BRANCH)
                .or_else(|| gh.branch.clone())
                .unwrap_or(publish_defaults.branch),
            api_base: var(ENV_GITHUB_API_BASE)
                .or_else(|| gh.api_base.clone())
                .unwrap_or(publish_defaults.api_base),
            web_base: gh.web_base.clone().unwrap_or(publish_defaults.web_base),
            timeout_secs: gh.timeout_secs.unwrap_or(publish_defaults.timeout_secs),
        };

        Ok(Self {
            generation,
            publish,
            output_root: file.output_root.clone().unwrap_or_else(|| PathBuf::from(".")),
            logging: file.logging.unwrap_or_default(),
        })
    }

    /// Convenience wrapper over [`AppConfig::resolve`] with the process environment.
    pub fn from_env(file: &FileConfig) -> Result<Self, PipelineError> {
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.generation.validate()?;
        self.publish.validate()
    }
}
