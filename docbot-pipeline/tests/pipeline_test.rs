//! End-to-end pipeline tests over stub collaborators: the happy path,
//! history invariants on dispatch failure, retrieval degradation, and
//! cross-session isolation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ConstEmbedding, FailingEmbedding, ScriptedCompletionClient};
use completion_client::CompletionDispatcher;
use doc_index::{ChunkParams, VectorIndex};
use docbot_core::{PipelineError, Role};
use docbot_pipeline::{ChatPipeline, ContextRetriever};
use embedding::EmbeddingService;
use session_store::{InMemorySessionStore, SessionStore};

const SYSTEM: &str = "You are the office assistant.";
const TTL: Duration = Duration::from_secs(3600);

fn pipeline_over(
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingService>,
    client: Arc<ScriptedCompletionClient>,
) -> (ChatPipeline, Arc<InMemorySessionStore>) {
    let sessions = Arc::new(InMemorySessionStore::new(TTL));
    let retriever = ContextRetriever::new(Arc::new(index), embedder);
    let dispatcher = CompletionDispatcher::new(client);
    let pipeline = ChatPipeline::new(retriever, sessions.clone(), dispatcher, SYSTEM);
    (pipeline, sessions)
}

#[tokio::test]
async fn first_turn_over_empty_index_round_trips() {
    let client = Arc::new(ScriptedCompletionClient::replying("hi there"));
    let (pipeline, sessions) =
        pipeline_over(VectorIndex::empty(), Arc::new(ConstEmbedding), client.clone());

    let reply = pipeline.handle("user-1", "hello").await.unwrap();
    assert_eq!(reply, "hi there");

    // Empty index and empty session: the prompt is system + question only.
    let prompts = client.prompts.lock().await;
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0], format!("{}\n\nUser: hello", SYSTEM));
    drop(prompts);

    // Exactly two turns recorded, user first.
    let turns = sessions.recent("user-1", 8).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "hello");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, "hi there");
}

#[tokio::test]
async fn retrieved_context_and_history_reach_the_prompt() {
    let corpus = "the office opens at nine in the morning every weekday";
    let embedder = Arc::new(ConstEmbedding);
    let index = VectorIndex::build(corpus, &ChunkParams::new(100, 10).unwrap(), &*embedder)
        .await
        .unwrap();
    let client = Arc::new(ScriptedCompletionClient::replying("at nine"));
    let (pipeline, _sessions) = pipeline_over(index, embedder, client.clone());

    pipeline.handle("user-1", "when do you open?").await.unwrap();
    pipeline.handle("user-1", "and on saturday?").await.unwrap();

    let prompts = client.prompts.lock().await;
    assert!(prompts[0].contains(corpus));
    // The second prompt carries the first exchange as history.
    assert!(prompts[1].contains("User: when do you open?"));
    assert!(prompts[1].contains("Assistant: at nine"));
    assert!(prompts[1].ends_with("User: and on saturday?"));
}

#[tokio::test]
async fn dispatch_failure_leaves_history_unchanged() {
    let client = Arc::new(ScriptedCompletionClient::failing("connection refused"));
    let (pipeline, sessions) =
        pipeline_over(VectorIndex::empty(), Arc::new(ConstEmbedding), client);

    sessions
        .append("user-1", docbot_core::Turn::user("earlier"))
        .await
        .unwrap();
    let before = sessions.recent("user-1", 100).await.unwrap();

    let err = pipeline.handle("user-1", "hello").await.unwrap_err();
    assert!(matches!(err, PipelineError::Completion(_)));

    let after = sessions.recent("user-1", 100).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn retrieval_failure_degrades_to_empty_context() {
    // The embedder fails on every call, so retrieval can never succeed;
    // the turn must still complete with a context-free prompt.
    let corpus = "some indexed text";
    let build_embedder = ConstEmbedding;
    let index = VectorIndex::build(corpus, &ChunkParams::new(100, 10).unwrap(), &build_embedder)
        .await
        .unwrap();

    let client = Arc::new(ScriptedCompletionClient::replying("still fine"));
    let (pipeline, sessions) = pipeline_over(index, Arc::new(FailingEmbedding), client.clone());

    let reply = pipeline.handle("user-1", "hello").await.unwrap();
    assert_eq!(reply, "still fine");

    let prompts = client.prompts.lock().await;
    assert!(!prompts[0].contains(corpus));
    drop(prompts);

    assert_eq!(sessions.recent("user-1", 8).await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sessions_stay_isolated() {
    let client = Arc::new(ScriptedCompletionClient::replying("ok"));
    let (pipeline, sessions) =
        pipeline_over(VectorIndex::empty(), Arc::new(ConstEmbedding), client);

    let mut handles = Vec::new();
    for i in 0..16 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("session-{}", i);
            pipeline
                .handle(&key, &format!("question from {}", i))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), "ok");
    }

    for i in 0..16 {
        let key = format!("session-{}", i);
        let turns = sessions.recent(&key, 8).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, format!("question from {}", i));
    }
}

#[tokio::test]
async fn history_window_caps_what_the_prompt_sees() {
    let client = Arc::new(ScriptedCompletionClient::replying("ok"));
    let (pipeline, sessions) =
        pipeline_over(VectorIndex::empty(), Arc::new(ConstEmbedding), client.clone());
    let pipeline = pipeline.with_history_window(4);

    for i in 0..6 {
        sessions
            .append("user-1", docbot_core::Turn::user(format!("old {}", i)))
            .await
            .unwrap();
    }

    pipeline.handle("user-1", "latest").await.unwrap();

    let prompts = client.prompts.lock().await;
    assert!(!prompts[0].contains("old 0"));
    assert!(!prompts[0].contains("old 1"));
    assert!(prompts[0].contains("old 2"));
    assert!(prompts[0].contains("old 5"));
}
