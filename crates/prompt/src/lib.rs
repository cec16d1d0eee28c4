//! # Prompt
//!
//! Assembles one completion request string from system instructions, the
//! retrieved context block, a bounded window of recent history, and the new
//! user message.
//!
//! ## Format
//!
//! Flattening order is fixed and reproducible (tests depend on it):
//!
//! 1. System instructions
//! 2. **Conversation (recent)**: role-tagged history lines, oldest first
//! 3. **Reference material**: the retrieved context block
//! 4. The new user message as a final `User:` line
//!
//! Empty sections are omitted entirely. The payload is ephemeral: it exists
//! for one pipeline invocation and is never persisted.

use docbot_core::Turn;

/// Default system instruction when no custom one is configured.
pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str =
    "You are a helpful assistant. Answer the user's question, using the reference material when it is relevant.";

/// Section title for the recent-history window.
pub const SECTION_RECENT: &str = "Conversation (recent):";

/// Section title for the retrieved context block.
pub const SECTION_CONTEXT: &str = "Reference material:";

/// Default cap on history turns included in a prompt.
pub const DEFAULT_HISTORY_WINDOW: usize = 8;

/// Everything needed to render one completion request. Owned by the single
/// in-flight pipeline invocation that created it.
#[derive(Debug, Clone)]
pub struct PromptPayload {
    pub system_instructions: String,
    pub context_block: String,
    pub history_window: Vec<Turn>,
    pub user_message: String,
}

/// Builds a [`PromptPayload`], silently dropping history older than
/// `history_cap` turns. Over-long history is never an error; the prompt just
/// keeps the most recent entries.
pub fn assemble(
    system_instructions: &str,
    context_block: &str,
    mut history: Vec<Turn>,
    user_message: &str,
    history_cap: usize,
) -> PromptPayload {
    if history.len() > history_cap {
        history.drain(..history.len() - history_cap);
    }
    PromptPayload {
        system_instructions: system_instructions.to_string(),
        context_block: context_block.to_string(),
        history_window: history,
        user_message: user_message.to_string(),
    }
}

impl PromptPayload {
    /// Renders the payload into the single request string sent to the
    /// completion service. Deterministic: same payload, same output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.system_instructions);
        out.push_str("\n\n");

        if !self.history_window.is_empty() {
            out.push_str(SECTION_RECENT);
            out.push('\n');
            for turn in &self.history_window {
                out.push_str(turn.role.tag());
                out.push_str(": ");
                out.push_str(&turn.content);
                out.push('\n');
            }
            out.push('\n');
        }

        if !self.context_block.is_empty() {
            out.push_str(SECTION_CONTEXT);
            out.push('\n');
            out.push_str(&self.context_block);
            out.push_str("\n\n");
        }

        out.push_str("User: ");
        out.push_str(&self.user_message);
        out
    }
}
