//! Error taxonomy for the pipeline and its collaborators.
//!
//! Index lifecycle errors are typed per stage because callers react
//! differently to each: a load failure falls back to a rebuild, a persist
//! failure is logged and swallowed, a build failure is fatal at startup.

use std::time::Duration;

use thiserror::Error;

/// Vector index lifecycle errors.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index build failed: {0}")]
    Build(String),

    #[error("Index load failed: {0}")]
    Load(String),

    #[error("Index persist failed: {0}")]
    Persist(String),
}

/// Completion service failures, surfaced to the caller of the pipeline.
/// No retry at this layer; a failed turn is never written to history, so the
/// user can resend the same message without duplication risk.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion service error: {0}")]
    Service(String),

    #[error("Completion request timed out after {0:?}")]
    Timeout(Duration),
}

/// Top-level error for pipeline callers.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
