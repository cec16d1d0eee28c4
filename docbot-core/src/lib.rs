//! # docbot-core
//!
//! Core types and errors for the docbot workspace: [`Turn`] and [`Role`], the
//! error taxonomy ([`IndexError`], [`CompletionError`], [`PipelineError`]),
//! and tracing initialization. Transport-agnostic; used by every other crate
//! in the workspace.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{CompletionError, IndexError, PipelineError, Result};
pub use logger::init_tracing;
pub use types::{Role, Turn};
