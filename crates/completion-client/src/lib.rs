//! # Completion client
//!
//! The external completion service boundary: a rendered prompt string goes
//! in, assistant text comes out. [`CompletionClient`] is the object-safe
//! trait, [`OpenAICompletionClient`] the production implementation, and
//! [`CompletionDispatcher`] the concurrency/timeout bound every pipeline
//! call goes through.

use async_trait::async_trait;
use docbot_core::CompletionError;

mod dispatcher;
mod openai;

pub use dispatcher::{CompletionDispatcher, DEFAULT_COMPLETION_TIMEOUT, DEFAULT_MAX_IN_FLIGHT};
pub use openai::{mask_token, OpenAICompletionClient};

/// Completion service interface: one rendered request, one text reply.
/// Error and timeout signaling only; retry policy belongs to callers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the rendered prompt and returns the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
