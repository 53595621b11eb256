//! Data model shared by every scenariogen crate.
//!
//! Everything here lives for a single invocation: a request is built from
//! CLI input, the backend answers with raw text, the text is cleaned into
//! an artifact, the artifact gets a target location and finally a publish
//! record. Only the written files outlive the process.

pub mod artifact;
pub mod location;
pub mod publish;
pub mod request;

pub use artifact::{ArtifactKind, CleanedArtifact};
pub use location::TargetLocation;
pub use publish::{PublishOutcome, PublishRecord};
pub use request::{GenerationRequest, GenerationResult};
