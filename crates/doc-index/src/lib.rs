//! # Document Index
//!
//! Chunks a source corpus and maintains a nearest-neighbor index over chunk
//! embeddings. The index is built once (or loaded from disk) at process
//! start and is read-only afterwards: queries take `&self` and the index is
//! shared behind an `Arc` with no locking.
//!
//! Lifecycle: `load` a persisted index if one exists; on load failure fall
//! back to `build` from the corpus and `save` the result. A failed save only
//! costs a rebuild on the next start, so callers log and continue.

use std::path::Path;

use docbot_core::IndexError;
use embedding::EmbeddingService;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod chunker;

pub use chunker::{split, ChunkParams};

/// One indexed unit of source text with its embedding. Created at build time
/// and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Nearest-neighbor index over chunk embeddings.
///
/// Every chunk's embedding and every query embedding must come from the same
/// `EmbeddingService`; the index itself cannot detect a mismatched embedding
/// space, it just returns meaningless neighbors.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    /// Chunks `corpus` with `params` and embeds every chunk in one batch
    /// call. Fails with [`IndexError::Build`] when the corpus is empty or
    /// the embedding service is unreachable.
    pub async fn build(
        corpus: &str,
        params: &ChunkParams,
        embedder: &dyn EmbeddingService,
    ) -> Result<Self, IndexError> {
        if corpus.trim().is_empty() {
            return Err(IndexError::Build("corpus is empty".to_string()));
        }

        let texts = chunker::split(corpus, params);
        info!(
            corpus_chars = corpus.chars().count(),
            chunk_count = texts.len(),
            chunk_size = params.chunk_size(),
            overlap = params.overlap(),
            "Building vector index from corpus"
        );

        let embeddings = embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| IndexError::Build(format!("embedding corpus chunks: {}", e)))?;
        if embeddings.len() != texts.len() {
            return Err(IndexError::Build(format!(
                "embedding count mismatch: {} chunks, {} embeddings",
                texts.len(),
                embeddings.len()
            )));
        }

        let chunks = texts
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| Chunk { text, embedding })
            .collect();
        Ok(Self { chunks })
    }

    /// Deserializes a previously persisted index. A missing path or an
    /// unreadable format is [`IndexError::Load`]; the caller falls back to
    /// [`VectorIndex::build`].
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let bytes = std::fs::read(path)
            .map_err(|e| IndexError::Load(format!("{}: {}", path.display(), e)))?;
        let index: Self = serde_json::from_slice(&bytes)
            .map_err(|e| IndexError::Load(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), chunk_count = index.chunks.len(), "Loaded vector index");
        Ok(index)
    }

    /// Persists the index. Failure is [`IndexError::Persist`] and non-fatal
    /// to serving.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| IndexError::Persist(format!("{}: {}", parent.display(), e)))?;
        }
        let bytes = serde_json::to_vec(self)
            .map_err(|e| IndexError::Persist(e.to_string()))?;
        std::fs::write(path, bytes)
            .map_err(|e| IndexError::Persist(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), chunk_count = self.chunks.len(), "Persisted vector index");
        Ok(())
    }

    /// Returns the `k` chunks nearest to `text` by cosine distance, ties
    /// broken by original chunk insertion order. An empty index yields an
    /// empty result, not an error. `embedder` must be the build-time service.
    pub async fn query(
        &self,
        text: &str,
        k: usize,
        embedder: &dyn EmbeddingService,
    ) -> Result<Vec<Chunk>, anyhow::Error> {
        if self.chunks.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = embedder.embed(text).await?;

        let mut scored: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (i, cosine_distance(&query_embedding, &chunk.embedding)))
            .collect();
        // Stable sort keeps insertion order among equal distances.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        debug!(
            k = k,
            returned = scored.len(),
            nearest_distance = scored.first().map(|(_, d)| *d),
            "Vector index query"
        );
        Ok(scored
            .into_iter()
            .map(|(i, _)| self.chunks[i].clone())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Builds an empty index. Queries against it return no chunks; useful
    /// when serving should start even though no corpus is configured.
    pub fn empty() -> Self {
        Self { chunks: Vec::new() }
    }
}

/// Cosine distance (1 - cosine similarity). Zero-magnitude vectors compare
/// as maximally distant rather than dividing by zero.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 1.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot_product / (norm_a * norm_b)
}
