/// Everything the publisher needs for one commit. Built right before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishRecord {
    /// Repository-relative path, forward slashes.
    pub remote_path: String,
    pub branch: String,
    pub commit_message: String,
    /// Raw UTF-8 bytes; the publisher handles transport encoding.
    pub content: Vec<u8>,
}

/// Result of the publish stage. Failures here never undo the local write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    Published {
        preview_url: String,
    },
    /// Publishing was disabled for this run.
    Skipped,
    Failed {
        /// HTTP status when the server answered at all.
        status: Option<u16>,
        message: String,
    },
}

