//! Error taxonomy for scenariogen.
//!
//! The pure stages (sanitize, clean, tags, prompt) cannot fail. Everything
//! that can fails at one of three boundaries: the generation backend, the
//! local filesystem, or the hosting API. Configuration problems are caught
//! before any of them is touched.

use std::fmt;

/// Which stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Generation,
    Filesystem,
    Publish,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Generation => write!(f, "generation"),
            ErrorCategory::Filesystem => write!(f, "filesystem"),
            ErrorCategory::Publish => write!(f, "publish"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required credential or identifier is missing or unusable.
    #[error("[configuration] {0}")]
    Configuration(String),

    /// The backend call failed or returned nothing usable. Nothing was written.
    #[error("[generation] {0:#}")]
    Generation(anyhow::Error),

    /// Creating the output directory or writing the file failed. Nothing was published.
    #[error("[filesystem] {0:#}")]
    Filesystem(anyhow::Error),

    /// The hosting API refused the commit or could not be reached.
    /// The local file is still there.
    #[error("[publish] {message}")]
    Publish { status: Option<u16>, message: String },
}

impl PipelineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PipelineError::Configuration(message.into())
    }

    /// A non-success HTTP answer from the hosting API.
    pub fn publish_status(status: u16, body: impl AsRef<str>) -> Self {
        PipelineError::Publish {
            status: Some(status),
            message: format!("{status} - {}", body.as_ref()),
        }
    }

    /// The hosting API could not be reached at all.
    pub fn publish_transport(err: &anyhow::Error) -> Self {
        PipelineError::Publish {
            status: None,
            message: format!("{err:#}"),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Configuration(_) => ErrorCategory::Configuration,
            PipelineError::Generation(_) => ErrorCategory::Generation,
            PipelineError::Filesystem(_) => ErrorCategory::Filesystem,
            PipelineError::Publish { .. } => ErrorCategory::Publish,
        }
    }

    /// Publish failures leave a usable local artifact; everything else aborts the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PipelineError::Publish { .. })
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Generation => 3,
            ErrorCategory::Filesystem => 4,
            ErrorCategory::Publish => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
