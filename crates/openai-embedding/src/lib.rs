//! # OpenAI Embedding Service
//!
//! Implements the `EmbeddingService` trait against an OpenAI-compatible
//! embeddings API (e.g. `text-embedding-3-small`).
//!
//! The index built with one model is only meaningful for queries embedded
//! with the same model; callers hold a single shared instance for both the
//! build and query paths.

use async_openai::{types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use embedding::EmbeddingService;
use tracing::{debug, instrument, warn};

/// Per-request timeout (connect + request + response).
const EMBED_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// OpenAI embedding service. Holds the async-openai client and model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedding {
    /// Creates an embedding service for the given API key and model.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, None)
    }

    /// Creates an embedding service with an optional base URL for
    /// OpenAI-compatible endpoints (proxies, alternative providers).
    pub fn with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let mut config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// Returns the embedding model name (for diagnostics and tests).
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(vec![text])
            .build()?;

        let embeddings = self.client.embeddings();
        let create = embeddings.create(request);
        let response = match tokio::time::timeout(EMBED_TIMEOUT, create).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                warn!(error = %e, "Embed request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = EMBED_TIMEOUT.as_secs(), "Embed request timed out");
                anyhow::bail!(
                    "embed request timed out after {} seconds",
                    EMBED_TIMEOUT.as_secs()
                );
            }
        };

        match response.data.into_iter().next() {
            Some(item) => {
                debug!(dimension = item.embedding.len(), "Embedding received");
                Ok(item.embedding)
            }
            None => anyhow::bail!("embedding response contains no data"),
        }
    }

    #[instrument(skip(self, texts), fields(model = %self.model, count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(texts.to_vec())
            .build()?;

        let embeddings = self.client.embeddings();
        let create = embeddings.create(request);
        let response = match tokio::time::timeout(EMBED_TIMEOUT, create).await {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => {
                warn!(error = %e, "Batch embed request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = EMBED_TIMEOUT.as_secs(), "Batch embed request timed out");
                anyhow::bail!(
                    "batch embed request timed out after {} seconds",
                    EMBED_TIMEOUT.as_secs()
                );
            }
        };

        // The API returns one embedding per input, indexed; keep input order.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        if data.len() != texts.len() {
            anyhow::bail!(
                "embedding response count mismatch: sent {}, received {}",
                texts.len(),
                data.len()
            );
        }
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}
