//! docbot CLI: chat against the RAG pipeline or (re)build the vector index.
//! Config comes from env (.env supported); see config.rs for the variables.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use completion_client::{CompletionDispatcher, OpenAICompletionClient};
use docbot_core::init_tracing;
use docbot_pipeline::{ChatPipeline, ContextRetriever};
use openai_embedding::OpenAIEmbedding;
use prompt::DEFAULT_SYSTEM_INSTRUCTIONS;
use session_store::InMemorySessionStore;
use tracing::info;

mod bootstrap;
mod chat;
mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "docbot")]
#[command(about = "RAG chat assistant: chat, build-index", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat on stdin/stdout (loads the index, builds it if missing).
    Chat {
        /// Session key for this conversation; defaults to "local".
        #[arg(short, long, default_value = "local")]
        session: String,
    },
    /// Rebuild the vector index from the corpus and persist it.
    BuildIndex,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Load config from environment")?;
    config.validate().context("Validate config")?;

    if let Some(parent) = std::path::Path::new(&config.log_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    init_tracing(&config.log_file)?;

    match cli.command {
        Commands::Chat { session } => run(config, &session).await,
        Commands::BuildIndex => {
            let embedder = make_embedder(&config);
            let chunk_count = bootstrap::rebuild_index(&config, &embedder).await?;
            println!("Indexed {} chunks to {}", chunk_count, config.index_path);
            Ok(())
        }
    }
}

fn make_embedder(config: &AppConfig) -> OpenAIEmbedding {
    OpenAIEmbedding::with_base_url(
        config.openai_api_key.clone(),
        config.embedding_model.clone(),
        config.openai_base_url.as_deref(),
    )
}

async fn run(config: AppConfig, session_key: &str) -> Result<()> {
    info!(model = %config.model, embedding_model = %config.embedding_model, "Starting docbot");

    let embedder = Arc::new(make_embedder(&config));
    let index = Arc::new(bootstrap::load_or_build_index(&config, embedder.as_ref()).await?);
    info!(chunk_count = index.len(), "Vector index ready");

    let sessions = Arc::new(InMemorySessionStore::new(config.session_ttl));
    let client = Arc::new(OpenAICompletionClient::with_base_url(
        config.openai_api_key.clone(),
        config.model.clone(),
        config.openai_base_url.as_deref(),
    ));
    let dispatcher =
        CompletionDispatcher::with_limits(client, config.max_in_flight, config.completion_timeout)?;

    let system_instructions = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_INSTRUCTIONS);
    let retriever = ContextRetriever::new(index, embedder);
    let pipeline = ChatPipeline::new(retriever, sessions, dispatcher, system_instructions)
        .with_history_window(config.history_window);

    chat::run_chat(pipeline, session_key, &config.greeting).await
}
