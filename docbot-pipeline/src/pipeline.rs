//! Conversational pipeline orchestrator.
//!
//! One `handle` call is one turn. The step order is fixed: retrieve context,
//! read recent history, assemble the prompt, dispatch, and only then append
//! the user and assistant turns. History is written after a successful
//! completion and never before, so every assistant turn on record
//! corresponds to a reply that was actually produced, and a failed turn can
//! be retried by the user without duplicating history. Cancellation gets the
//! same guarantee for free: dropping the `handle` future mid-dispatch means
//! the appends below it never run.

use std::sync::Arc;

use completion_client::CompletionDispatcher;
use docbot_core::{PipelineError, Turn};
use prompt::{assemble, DEFAULT_HISTORY_WINDOW};
use session_store::SessionStore;
use tracing::{info, instrument, warn};

use super::retriever::ContextRetriever;

/// Per-turn request/response cycle over shared, injected collaborators.
#[derive(Clone)]
pub struct ChatPipeline {
    retriever: ContextRetriever,
    sessions: Arc<dyn SessionStore>,
    dispatcher: CompletionDispatcher,
    system_instructions: String,
    history_window: usize,
}

impl ChatPipeline {
    pub fn new(
        retriever: ContextRetriever,
        sessions: Arc<dyn SessionStore>,
        dispatcher: CompletionDispatcher,
        system_instructions: impl Into<String>,
    ) -> Self {
        Self {
            retriever,
            sessions,
            dispatcher,
            system_instructions: system_instructions.into(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Overrides the number of recent turns read into each prompt.
    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    /// Runs one conversational turn for `session_key` and returns the
    /// assistant's reply.
    ///
    /// Retrieval failure degrades to an empty context block and never aborts
    /// the turn. Dispatch failure propagates and leaves history untouched.
    #[instrument(skip(self, user_message), fields(session_key = %session_key))]
    pub async fn handle(
        &self,
        session_key: &str,
        user_message: &str,
    ) -> Result<String, PipelineError> {
        let context_block = match self.retriever.retrieve(user_message).await {
            Ok(block) => block,
            Err(e) => {
                warn!(error = %e, "Context retrieval failed, continuing without context");
                String::new()
            }
        };

        let history = self
            .sessions
            .recent(session_key, self.history_window)
            .await
            .map_err(|e| PipelineError::Session(e.to_string()))?;

        let payload = assemble(
            &self.system_instructions,
            &context_block,
            history,
            user_message,
            self.history_window,
        );
        let rendered = payload.render();

        let reply = self.dispatcher.dispatch(&rendered).await?;

        // Both turns land only after the completion succeeded, user first.
        self.sessions
            .append(session_key, Turn::user(user_message))
            .await
            .map_err(|e| PipelineError::Session(e.to_string()))?;
        self.sessions
            .append(session_key, Turn::assistant(&reply))
            .await
            .map_err(|e| PipelineError::Session(e.to_string()))?;

        info!(
            context_len = context_block.len(),
            reply_len = reply.len(),
            "Turn completed"
        );
        Ok(reply)
    }
}
