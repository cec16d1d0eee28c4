//! Shared stubs for pipeline integration tests: a scripted completion
//! client that records the prompts it receives, and deterministic / failing
//! embedders.

use std::sync::Arc;

use async_trait::async_trait;
use completion_client::CompletionClient;
use docbot_core::CompletionError;
use embedding::EmbeddingService;
use tokio::sync::Mutex;

/// Completion client that replies with a fixed string (or a fixed error) and
/// keeps every prompt it was asked to complete.
pub struct ScriptedCompletionClient {
    reply: Result<String, String>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedCompletionClient {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().await.push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(CompletionError::Service(message.clone())),
        }
    }
}

/// Embedder returning a constant vector; enough for an index whose ranking
/// is irrelevant to the test.
pub struct ConstEmbedding;

#[async_trait]
impl EmbeddingService for ConstEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

/// Embedder that always fails; used to prove retrieval soft-fails.
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingService for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        anyhow::bail!("embedding service unreachable")
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        anyhow::bail!("embedding service unreachable")
    }
}
