use crate::config::{LlmConfig, LlmProvider};
use anyhow::{Context, Result, anyhow};
use scenariogen_ports::Generator;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

fn http_client(timeout_secs: u64) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("build reqwest client")
}

fn check_status(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        anyhow::bail!("LLM API returned {status}: {text}");
    }
    Ok(resp)
}

/// Backend for the Google Generative Language API.
pub struct GeminiBackend {
    /// API base, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl GeminiBackend {
    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl Generator for GeminiBackend {
    fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let client = http_client(self.timeout_secs)?;

        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] }
            ],
            "generationConfig": { "temperature": self.temperature }
        });

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "gemini generateContent");
        let resp = client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .context("LLM API request failed")?;
        let resp = check_status(resp)?;

        let json: serde_json::Value = resp.json().context("parse LLM response")?;
        gemini_text(&json)
    }
}

/// Joins the text parts of the first candidate.
fn gemini_text(json: &serde_json::Value) -> Result<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array();
    let text: String = parts
        .into_iter()
        .flatten()
        .filter_map(|p| p["text"].as_str())
        .collect();

    if text.is_empty() {
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(anyhow!("prompt blocked by Gemini: {reason}"));
        }
        return Err(anyhow!("no content in LLM response"));
    }
    Ok(text)
}

/// Backend that speaks the OpenAI chat completions protocol.
pub struct OpenAiCompatibleBackend {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Generator for OpenAiCompatibleBackend {
    fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let client = http_client(self.timeout_secs)?;

        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ]
        });

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "chat completion");
        let resp = client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .context("LLM API request failed")?;
        let resp = check_status(resp)?;

        let json: serde_json::Value = resp.json().context("parse LLM response")?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("no content in LLM response"))?
            .to_string();

        Ok(content)
    }
}

/// Builds the backend selected by `config.provider`.
pub fn backend_from_config(config: &LlmConfig) -> Box<dyn Generator> {
    match config.provider {
        LlmProvider::Gemini => Box::new(GeminiBackend {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        }),
        LlmProvider::OpenAi => Box::new(OpenAiCompatibleBackend {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        }),
    }
}

/// Mock backend for testing.
pub struct MockGenerator {
    pub response: String,
}

impl Generator for MockGenerator {
    fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// Mock backend that always fails.
pub struct FailingGenerator;

impl Generator for FailingGenerator {
    fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
        anyhow::bail!("LLM backend failed (mock)")
    }
}

/// Mock backend that answers from a queue and keeps every prompt it saw.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// User prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, _system: &str, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("scripted generator ran out of responses"))
    }
}
