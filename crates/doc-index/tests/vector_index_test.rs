//! Integration tests for VectorIndex build / load / save / query.
//!
//! Uses the deterministic StubEmbedding from tests/common so no network or
//! real embedding model is involved.

mod common;

use common::{FailingEmbedding, StubEmbedding};
use doc_index::{ChunkParams, VectorIndex};
use docbot_core::IndexError;

fn small_params() -> ChunkParams {
    ChunkParams::new(64, 8).unwrap()
}

#[tokio::test]
async fn single_chunk_index_returns_that_chunk_for_any_query() {
    let corpus = "the office is open monday to friday";
    let embedder = StubEmbedding::new(vec![1.0, 0.0]).with_vector(corpus, vec![1.0, 0.0]);
    let index = VectorIndex::build(corpus, &small_params(), &embedder)
        .await
        .unwrap();
    assert_eq!(index.len(), 1);

    // Any query maps to the fallback vector and still finds the only chunk.
    let hits = index.query("when are you open?", 4, &embedder).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, corpus);

    // An identical-text query shares the chunk's exact embedding.
    let hits = index.query(corpus, 1, &embedder).await.unwrap();
    assert_eq!(hits[0].text, corpus);
}

#[tokio::test]
async fn query_ranks_by_distance_with_insertion_order_ties() {
    // Three chunks: two share an embedding (tie), one is orthogonal.
    let params = ChunkParams::new(16, 0).unwrap();
    let corpus = "aaaabbbbccccddddeeeeffffgggghhhhiiiijjjjkkkkllll";
    let embedder = StubEmbedding::new(vec![1.0, 0.0])
        .with_vector("aaaabbbbccccdddd", vec![1.0, 0.0])
        .with_vector("eeeeffffgggghhhh", vec![0.0, 1.0])
        .with_vector("iiiijjjjkkkkllll", vec![1.0, 0.0]);
    let index = VectorIndex::build(corpus, &params, &embedder).await.unwrap();
    assert_eq!(index.len(), 3);

    let hits = index.query("aaaabbbbccccdddd", 3, &embedder).await.unwrap();
    assert_eq!(hits.len(), 3);
    // Tied nearest chunks keep insertion order; the orthogonal one is last.
    assert_eq!(hits[0].text, "aaaabbbbccccdddd");
    assert_eq!(hits[1].text, "iiiijjjjkkkkllll");
    assert_eq!(hits[2].text, "eeeeffffgggghhhh");

    let hits = index.query("aaaabbbbccccdddd", 2, &embedder).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn empty_index_query_returns_empty_not_error() {
    let embedder = StubEmbedding::new(vec![1.0]);
    let index = VectorIndex::empty();
    let hits = index.query("anything", 4, &embedder).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn build_fails_on_empty_corpus() {
    let embedder = StubEmbedding::new(vec![1.0]);
    let err = VectorIndex::build("   \n  ", &small_params(), &embedder)
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::Build(_)));
}

#[tokio::test]
async fn build_fails_when_embedder_is_unreachable() {
    let err = VectorIndex::build("some corpus text", &small_params(), &FailingEmbedding)
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::Build(_)));
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let corpus = "a corpus that spans more than one chunk so the index has several entries";
    let params = ChunkParams::new(24, 4).unwrap();
    let embedder = StubEmbedding::new(vec![0.5, 0.5]);
    let index = VectorIndex::build(corpus, &params, &embedder).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    index.save(&path).unwrap();

    let loaded = VectorIndex::load(&path).unwrap();
    assert_eq!(loaded.len(), index.len());

    let before = index.query("anything", 2, &embedder).await.unwrap();
    let after = loaded.query("anything", 2, &embedder).await.unwrap();
    assert_eq!(before, after);
}

#[test]
fn load_missing_path_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = VectorIndex::load(&dir.path().join("no-such-index.json")).unwrap_err();
    assert!(matches!(err, IndexError::Load(_)));
}

#[test]
fn load_corrupt_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    std::fs::write(&path, b"not json at all").unwrap();
    let err = VectorIndex::load(&path).unwrap_err();
    assert!(matches!(err, IndexError::Load(_)));
}
