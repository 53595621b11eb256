use anyhow::Result;
use scenariogen_error::PipelineError;
use scenariogen_schema::PublishRecord;

/// Text generation.
///
/// Adapters live in `scenariogen-llm`. The reply is untrusted free-form
/// text; callers clean it.
pub trait Generator {
    fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Committing a file to a remote repository.
///
/// Adapters live in `scenariogen-publish-*` crates.
pub trait Publisher {
    /// Branch commits go to.
    fn branch(&self) -> &str;

    /// Browser URL where `remote_path` will be viewable after a commit.
    fn preview_url(&self, remote_path: &str) -> String;

    /// Commits `record.content` to `record.remote_path`. Returns the preview URL.
    ///
    /// Errors are always [`PipelineError::Publish`].
    fn publish(&self, record: &PublishRecord) -> std::result::Result<String, PipelineError>;
}
