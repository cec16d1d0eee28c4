//! # docbot-pipeline
//!
//! The per-turn conversational pipeline: [`ContextRetriever`] pulls relevant
//! chunks from the vector index, [`ChatPipeline`] composes retrieval,
//! history, prompt assembly, and dispatch into one request/response cycle
//! and writes the exchange back to the session store.
//!
//! All collaborators are constructor-injected and `Arc`-shared; there is no
//! ambient global state, and many sessions run the pipeline concurrently.

pub mod pipeline;
pub mod retriever;

pub use pipeline::ChatPipeline;
pub use retriever::{ContextRetriever, DEFAULT_TOP_K};
