//! OpenAI-backed completion client: the rendered prompt is sent as a single
//! user message; the first choice's content is the reply.

use async_openai::{
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use docbot_core::CompletionError;
use std::sync::Arc;
use tracing::info;

use super::CompletionClient;

/// Masks an API key/token for safe logging: first 7 chars + "***" + last 4.
/// Keys of 11 chars or fewer become "***" so no part of them leaks.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        let head_len = 7.min(len);
        let tail_len = 4.min(len.saturating_sub(head_len));
        let head = &token[..head_len];
        let tail = if tail_len > 0 {
            &token[len - tail_len..]
        } else {
            ""
        };
        format!("{}***{}", head, tail)
    }
}

/// Chat-completion client for OpenAI-compatible APIs.
#[derive(Clone)]
pub struct OpenAICompletionClient {
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    model: String,
    /// Stored only for masked logging.
    api_key_for_logging: String,
}

impl OpenAICompletionClient {
    /// Builds a client for the default API base URL.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, None)
    }

    /// Builds a client with an optional custom base URL (proxies and
    /// OpenAI-compatible endpoints).
    pub fn with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let api_key_for_logging = api_key.clone();
        let mut config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Arc::new(Client::with_config(config)),
            model,
            api_key_for_logging,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OpenAICompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            api_key = %mask_token(&self.api_key_for_logging),
            "Completion request"
        );

        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| CompletionError::Service(e.to_string()))?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message.into()])
            .build()
            .map_err(|e| CompletionError::Service(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| CompletionError::Service(e.to_string()))?;

        if let Some(ref u) = response.usage {
            info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "Completion usage"
            );
        }

        match response.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content.unwrap_or_default()),
            None => Err(CompletionError::Service(
                "no choices in completion response".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mask_token;

    #[test]
    fn short_tokens_are_fully_masked() {
        assert_eq!(mask_token(""), "***");
        assert_eq!(mask_token("sk-12345678"), "***");
    }

    #[test]
    fn long_tokens_keep_head_and_tail() {
        assert_eq!(mask_token("sk-abcdefghijklmnop"), "sk-abcd***mnop");
    }
}
