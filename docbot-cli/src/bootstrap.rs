//! Index bootstrap: load a persisted index if present, otherwise build from
//! the corpus and try to persist the result.

use std::path::Path;

use anyhow::{Context, Result};
use doc_index::VectorIndex;
use embedding::EmbeddingService;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Startup triad: `load`, falling back to `build` + `save`. A failed save is
/// logged and swallowed — it only costs a rebuild on the next start. Runs
/// once at startup; the returned index is read-only for the process
/// lifetime.
pub async fn load_or_build_index(
    config: &AppConfig,
    embedder: &dyn EmbeddingService,
) -> Result<VectorIndex> {
    let index_path = Path::new(&config.index_path);

    match VectorIndex::load(index_path) {
        Ok(index) => return Ok(index),
        Err(e) => {
            info!(error = %e, "No usable persisted index, building from corpus");
        }
    }

    let corpus = std::fs::read_to_string(&config.corpus_path)
        .with_context(|| format!("Read corpus from {}", config.corpus_path))?;
    let params = config.chunk_params()?;
    let index = VectorIndex::build(&corpus, &params, embedder)
        .await
        .context("Build vector index from corpus")?;

    if let Err(e) = index.save(index_path) {
        warn!(error = %e, "Index persist failed; continuing, will rebuild next start");
    }

    Ok(index)
}

/// Unconditional rebuild for the `build-index` subcommand.
pub async fn rebuild_index(config: &AppConfig, embedder: &dyn EmbeddingService) -> Result<usize> {
    let corpus = std::fs::read_to_string(&config.corpus_path)
        .with_context(|| format!("Read corpus from {}", config.corpus_path))?;
    let params = config.chunk_params()?;
    let index = VectorIndex::build(&corpus, &params, embedder)
        .await
        .context("Build vector index from corpus")?;
    index
        .save(Path::new(&config.index_path))
        .context("Persist vector index")?;
    Ok(index.len())
}
