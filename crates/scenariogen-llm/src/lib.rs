//! Generation backends.
//!
//! Each backend implements [`scenariogen_ports::Generator`]: system
//! instruction and user prompt in, raw text out. Requests are blocking and
//! made once; there is no retry.

mod client;
mod config;

pub use client::{
    FailingGenerator, GeminiBackend, MockGenerator, OpenAiCompatibleBackend, ScriptedGenerator,
    backend_from_config,
};
pub use config::{LlmConfig, LlmProvider};
