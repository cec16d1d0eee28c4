//! App config loaded from environment variables (plus .env via dotenvy in
//! main). Load with [`AppConfig::from_env`], then call
//! [`AppConfig::validate`] to fail fast before any service is constructed.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use doc_index::ChunkParams;

/// Everything the binary needs, in one place. Service crates take plain
/// values; only this crate reads the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub embedding_model: String,
    pub system_prompt: Option<String>,
    pub greeting: String,
    pub corpus_path: String,
    pub index_path: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub session_ttl: Duration,
    pub history_window: usize,
    pub max_in_flight: usize,
    pub completion_timeout: Duration,
    pub log_file: String,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid value for {}", raw, key)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Loads config from environment variables.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let model = env::var("MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let embedding_model =
            env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "text-embedding-3-small".to_string());
        let system_prompt = env::var("SYSTEM_PROMPT")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let greeting = env::var("GREETING")
            .unwrap_or_else(|_| "Hello! Ask me anything about the documentation.".to_string());

        Ok(Self {
            openai_api_key,
            openai_base_url,
            model,
            embedding_model,
            system_prompt,
            greeting,
            corpus_path: env::var("CORPUS_PATH").unwrap_or_else(|_| "corpus.txt".to_string()),
            index_path: env::var("INDEX_PATH").unwrap_or_else(|_| "index.json".to_string()),
            chunk_size: env_parse("CHUNK_SIZE", 500)?,
            chunk_overlap: env_parse("CHUNK_OVERLAP", 50)?,
            session_ttl: Duration::from_secs(env_parse("SESSION_TTL_SECS", 3600u64)?),
            history_window: env_parse("HISTORY_WINDOW", 8)?,
            max_in_flight: env_parse("MAX_IN_FLIGHT", 10)?,
            completion_timeout: Duration::from_secs(env_parse("COMPLETION_TIMEOUT_SECS", 60u64)?),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "logs/docbot.log".to_string()),
        })
    }

    /// Validates everything that would otherwise fail mid-flight: chunking
    /// preconditions, the dispatcher bound, and the history window.
    pub fn validate(&self) -> Result<()> {
        self.chunk_params()?;
        if self.history_window == 0 {
            anyhow::bail!("HISTORY_WINDOW must be at least 1");
        }
        if self.max_in_flight == 0 {
            anyhow::bail!("MAX_IN_FLIGHT must be at least 1");
        }
        if self.completion_timeout.is_zero() {
            anyhow::bail!("COMPLETION_TIMEOUT_SECS must be at least 1");
        }
        if self.session_ttl.is_zero() {
            anyhow::bail!("SESSION_TTL_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn chunk_params(&self) -> Result<ChunkParams> {
        ChunkParams::new(self.chunk_size, self.chunk_overlap)
            .context("CHUNK_SIZE / CHUNK_OVERLAP are invalid")
    }
}
