//! Local chat loop: one stdin line in, one reply out.
//!
//! Stands in for the chat transport at its interface boundary (session key +
//! text in, reply string out). `/start` answers with the configured greeting
//! the way the bot's start command would; a completion failure produces a
//! single error line and leaves history untouched, so resending the same
//! message is safe.

use anyhow::Result;
use docbot_pipeline::ChatPipeline;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

const START_COMMAND: &str = "/start";

pub async fn run_chat(pipeline: ChatPipeline, session_key: &str, greeting: &str) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    info!(session_key = %session_key, "Chat loop started");
    stdout
        .write_all(format!("{}\n> ", greeting).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        let reply = if text == START_COMMAND {
            greeting.to_string()
        } else {
            match pipeline.handle(session_key, text).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, "Turn failed");
                    "Sorry, I could not produce an answer. Please try again.".to_string()
                }
            }
        };

        stdout.write_all(format!("{}\n> ", reply).as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Chat loop ended (stdin closed)");
    Ok(())
}
