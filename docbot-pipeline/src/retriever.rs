//! Context retriever: top-K nearest chunks for a query, joined into one
//! context block. No caching across calls.

use std::sync::Arc;

use doc_index::VectorIndex;
use embedding::EmbeddingService;
use tracing::debug;

/// Default number of chunks retrieved per query.
pub const DEFAULT_TOP_K: usize = 4;

/// Retrieves relevant corpus chunks for a user query. The index is read-only
/// shared state; the embedder must be the index's build-time service.
#[derive(Clone)]
pub struct ContextRetriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingService>,
    top_k: usize,
}

impl ContextRetriever {
    pub fn new(index: Arc<VectorIndex>, embedder: Arc<dyn EmbeddingService>) -> Self {
        Self {
            index,
            embedder,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Returns the top-K chunk texts joined with a blank line, in the order
    /// the index returns them; empty string when nothing matches (empty
    /// index). Errors (e.g. the embedding call failing) are the caller's to
    /// soften.
    pub async fn retrieve(&self, query: &str) -> Result<String, anyhow::Error> {
        let chunks = self
            .index
            .query(query, self.top_k, self.embedder.as_ref())
            .await?;

        debug!(
            top_k = self.top_k,
            returned = chunks.len(),
            "Context retrieval"
        );

        Ok(chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
