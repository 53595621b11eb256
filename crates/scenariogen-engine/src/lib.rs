//! Orchestration engine for the scenariogen pipeline.
//!
//! One linear pass per artifact:
//! prompt → generate → clean → tags → resolve path → write → publish.
//! Nothing is written when generation fails, and nothing is published
//! when the write fails. A publish failure is reported in the
//! [`RunReport`] and leaves the local file in place.

mod commit;

pub use commit::commit_message;

use anyhow::anyhow;
use scenariogen_clean::clean_for;
use scenariogen_error::PipelineError;
use scenariogen_output_layout::{
    ensure_dir, remote_folder, remote_path, resolve_location, write_new,
};
use scenariogen_ports::{Generator, Publisher};
use scenariogen_prompt::{build, build_conversion, system_prompt};
use scenariogen_sanitize::{sanitize, sanitize_or};
use scenariogen_schema::{
    ArtifactKind, CleanedArtifact, GenerationRequest, GenerationResult, PublishOutcome,
    PublishRecord,
};
use scenariogen_tags::tag_list;
use std::path::PathBuf;

/// Slug used when neither the file name nor the requirement yields one.
pub const FALLBACK_SLUG: &str = "untitled";

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory the `test-cases/` and `headless-test/` trees are created under.
    pub output_root: PathBuf,
    pub publish: bool,
}

/// Everything one invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub kind: ArtifactKind,
    pub requirement: String,
    pub squad: String,
    /// Overrides the requirement as the source of the file name.
    pub file_name: Option<String>,
    pub tag: Option<String>,
    pub other_tags: Option<String>,
    pub background: Option<String>,
    pub additional_background: Option<String>,
    /// After a scenario run, convert the scenarios into headless test code too.
    pub with_test_code: bool,
}

impl RunRequest {
    pub fn new(
        kind: ArtifactKind,
        requirement: impl Into<String>,
        squad: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            requirement: requirement.into(),
            squad: squad.into(),
            file_name: None,
            tag: None,
            other_tags: None,
            background: None,
            additional_background: None,
            with_test_code: false,
        }
    }

    fn generation_request(&self) -> GenerationRequest {
        GenerationRequest::new(self.kind, self.requirement.trim())
            .with_background(self.background.as_deref())
            .with_additional_context(self.additional_background.as_deref())
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub kind: ArtifactKind,
    pub local_path: PathBuf,
    /// Exact file content, tag line included.
    pub content: String,
    pub publish: PublishOutcome,
    /// Test code derived from the scenarios, when requested.
    pub derived: Option<Box<RunReport>>,
}

/// Names shared by every pass of one run.
struct Naming {
    squad_slug: String,
    base_slug: String,
    tags: Vec<String>,
}

pub struct Engine<'a> {
    pub generator: &'a dyn Generator,
    pub publisher: &'a dyn Publisher,
    pub config: EngineConfig,
}

impl<'a> Engine<'a> {
    pub fn new(
        generator: &'a dyn Generator,
        publisher: &'a dyn Publisher,
        config: EngineConfig,
    ) -> Self {
        Self {
            generator,
            publisher,
            config,
        }
    }

    /// Runs the pipeline for `request`, plus the derived test-code pass if asked.
    pub fn run(&self, request: &RunRequest) -> Result<RunReport> {
        if request.requirement.trim().is_empty() {
            return Err(PipelineError::configuration("requirement is empty"));
        }
        let naming = naming(request)?;
        tracing::info!(
            kind = %request.kind,
            squad = %naming.squad_slug,
            file = %naming.base_slug,
            "starting run"
        );

        let gen_request = request.generation_request();
        let prompt = build(&gen_request);
        let mut report = self.run_pass(request.kind, &prompt, &naming)?;

        if request.with_test_code && request.kind == ArtifactKind::ScenarioSet {
            let scenarios = strip_tag_line(&report.content, &naming.tags);
            let prompt = build_conversion(
                scenarios,
                gen_request.background.as_deref(),
                gen_request.additional_context.as_deref(),
            );
            tracing::info!("deriving headless test code from scenarios");
            let derived = self
                .run_pass(ArtifactKind::TestCode, &prompt, &naming)
                .map_err(|e| after_first_artifact(e, &report))?;
            report.derived = Some(Box::new(derived));
        }

        Ok(report)
    }

    fn run_pass(&self, kind: ArtifactKind, prompt: &str, naming: &Naming) -> Result<RunReport> {
        tracing::debug!(%kind, prompt_chars = prompt.len(), %prompt, "built prompt");

        tracing::info!(%kind, "generating");
        let raw = self
            .generator
            .generate(system_prompt(kind), prompt)
            .map_err(PipelineError::Generation)?;
        let result = GenerationResult::new(raw);
        if result.is_blank() {
            return Err(PipelineError::Generation(anyhow!(
                "backend returned an empty response"
            )));
        }

        tracing::info!(%kind, raw_chars = result.raw_text.len(), "cleaning");
        let text = clean_for(kind, &result.raw_text);
        if text.is_empty() {
            return Err(PipelineError::Generation(anyhow!(
                "nothing left of the response after cleanup"
            )));
        }
        let artifact = CleanedArtifact::new(kind, text, naming.tags.clone());
        let content = artifact.render();

        let target = resolve_location(
            &self.config.output_root,
            kind,
            &naming.squad_slug,
            &naming.base_slug,
        );
        tracing::info!(path = %target.path().display(), "writing");
        ensure_dir(&target).map_err(PipelineError::Filesystem)?;
        let written = write_new(&target, &content).map_err(PipelineError::Filesystem)?;

        let publish = if self.config.publish {
            self.publish(
                kind,
                &naming.squad_slug,
                &written.file_name,
                &naming.tags,
                &content,
            )
        } else {
            tracing::info!("publishing disabled, skipping");
            PublishOutcome::Skipped
        };

        Ok(RunReport {
            kind,
            local_path: written.path(),
            content,
            publish,
            derived: None,
        })
    }

    fn publish(
        &self,
        kind: ArtifactKind,
        squad_slug: &str,
        file_name: &str,
        tags: &[String],
        content: &str,
    ) -> PublishOutcome {
        let path = remote_path(kind, squad_slug, file_name);
        let preview = self.publisher.preview_url(&path);
        let record = PublishRecord {
            commit_message: commit_message(
                kind,
                file_name,
                &remote_folder(kind, squad_slug),
                tags,
                &preview,
            ),
            remote_path: path,
            branch: self.publisher.branch().to_string(),
            content: content.as_bytes().to_vec(),
        };

        tracing::info!(remote_path = %record.remote_path, branch = %record.branch, "publishing");
        match self.publisher.publish(&record) {
            Ok(preview_url) => PublishOutcome::Published { preview_url },
            Err(PipelineError::Publish { status, message }) => {
                tracing::warn!(?status, %message, "publish failed; local file kept");
                PublishOutcome::Failed { status, message }
            }
            Err(other) => {
                tracing::warn!(error = %other, "publish failed; local file kept");
                PublishOutcome::Failed {
                    status: None,
                    message: other.to_string(),
                }
            }
        }
    }
}

fn naming(request: &RunRequest) -> Result<Naming> {
    let squad_slug = sanitize(&request.squad);
    if squad_slug.is_empty() {
        return Err(PipelineError::configuration(format!(
            "squad {:?} has no usable characters for a folder name",
            request.squad
        )));
    }

    let base_slug = sanitize_or(
        request.file_name.as_deref().unwrap_or(""),
        &request.requirement,
    );
    let base_slug = if base_slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        base_slug
    };

    Ok(Naming {
        squad_slug,
        base_slug,
        tags: tag_list(request.tag.as_deref(), request.other_tags.as_deref()),
    })
}

/// The scenario text without the tag line `render` put in front of it.
fn strip_tag_line<'c>(content: &'c str, tags: &[String]) -> &'c str {
    if tags.is_empty() {
        return content;
    }
    let line = format!("{}\n\n", tags.join(" "));
    content.strip_prefix(line.as_str()).unwrap_or(content)
}

/// A derived-pass error, annotated with where the scenarios went.
fn after_first_artifact(err: PipelineError, first: &RunReport) -> PipelineError {
    let note = format!(
        "deriving test code failed; scenarios were saved to {}",
        first.local_path.display()
    );
    match err {
        PipelineError::Generation(e) => PipelineError::Generation(e.context(note)),
        PipelineError::Filesystem(e) => PipelineError::Filesystem(e.context(note)),
        other => other,
    }
}
