//! Top-level error types for the DraftWorks pipeline domain.
//!
//! [`PipelineError`] covers conditions that end a pipeline run. Stage-local
//! degradations (an unparseable research reply, an undecodable keyword
//! record) are **not** errors at this level: the affected stage substitutes
//! a well-formed fallback value and the run continues.
//!
//! [`MalformedResponse`] is the typed outcome every response-shape parser
//! returns on a miss; each stage decides locally whether to absorb it into
//! a fallback value or let the run fail.

use std::path::PathBuf;

use thiserror::Error;

use crate::ports::CompletionError;

// ---------------------------------------------------------------------------
// Parser outcome
// ---------------------------------------------------------------------------

/// An LLM reply did not match the shape a stage prompt asked for.
///
/// Produced by the parsers in [`crate::parse`]. This is a typed outcome,
/// not a hard failure: most consumers convert it into a fixed fallback
/// value and log a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {shape} reply: {detail}")]
pub struct MalformedResponse {
    /// Which reply shape was expected (e.g. `"research"`, `"keyword analysis"`).
    pub shape: &'static str,
    /// What was missing or undecodable.
    pub detail: String,
}

impl MalformedResponse {
    /// Creates a [`MalformedResponse`] for the given expected shape.
    pub fn new(shape: &'static str, detail: impl Into<String>) -> Self {
        Self {
            shape,
            detail: detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// Errors that end a pipeline run.
///
/// There is no retry policy anywhere in the pipeline: a failed provider
/// call either becomes one of these variants or is absorbed by the stage
/// that made it (see the stage documentation in the `agents` crate).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A provider completion call failed and the owning stage does not
    /// absorb completion failures.
    #[error("{stage} stage completion call failed: {source}")]
    Completion {
        /// Stage that issued the call (e.g. `"planning"`).
        stage: &'static str,
        /// The underlying provider failure.
        #[source]
        source: CompletionError,
    },

    /// No document was supplied to a stage and the persisted file it falls
    /// back to could not be read.
    #[error("no blog content provided and none could be read from {path}")]
    DraftUnavailable {
        /// The artifact path the stage tried to read.
        path: PathBuf,
    },

    /// An artifact could not be written to the output directory.
    #[error("failed to persist {path}: {source}")]
    Persist {
        /// The artifact path the stage tried to write.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The pipeline configuration is invalid.
    ///
    /// Produced at composition time; a run never starts with an invalid
    /// configuration.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}
