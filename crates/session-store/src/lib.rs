//! # Session History Store
//!
//! Keyed, TTL-bounded, append-only conversation logs. A session is created
//! implicitly on first append and becomes logically absent once idle longer
//! than the TTL; expiry is enforced inside the store, not by callers.
//!
//! The TTL is sliding: every `append` refreshes the session's idle deadline;
//! reads do not. The full log is kept per session for the TTL's duration
//! (bounded prompting is a read-side concern: callers pass `limit` to
//! [`SessionStore::recent`]).
//!
//! ## Concurrency
//!
//! `Arc<RwLock<HashMap>>` gives per-key linearizability as seen by a single
//! session's traffic: a `recent` issued after an `append` completes for the
//! same key observes the appended turn. Concurrent appends to the *same* key
//! are accepted as racy (their relative order is arbitrary); in practice the
//! chat transport serializes one user's messages. Distinct keys never
//! interfere.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use docbot_core::Turn;
use tokio::sync::RwLock;
use tracing::debug;

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

/// Default idle TTL: one hour without an append discards a session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Trait for per-session conversation history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Appends one turn to the session's log, creating the session if absent
    /// and refreshing its idle TTL.
    async fn append(&self, session_key: &str, turn: Turn) -> Result<(), anyhow::Error>;

    /// Returns the last `limit` turns in conversation order (oldest of the
    /// returned window first). Fewer if the session is shorter; empty if the
    /// session does not exist or has expired.
    async fn recent(&self, session_key: &str, limit: usize) -> Result<Vec<Turn>, anyhow::Error>;
}

struct SessionEntry {
    turns: Vec<Turn>,
    last_write: Instant,
}

/// In-memory session store with a sliding idle TTL.
///
/// Expired entries are invisible to readers immediately and physically
/// removed by a sweep on the next write, so memory does not grow with dead
/// sessions.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    /// Creates a store with the given idle TTL and the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock (tests use [`ManualClock`]).
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    /// Number of live (non-expired) sessions.
    pub async fn session_count(&self) -> usize {
        let now = self.clock.now();
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|e| !self.is_expired(e, now))
            .count()
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_write) > self.ttl
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, session_key: &str, turn: Turn) -> Result<(), anyhow::Error> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;

        // Writes double as the sweep point for dead sessions.
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_write) <= self.ttl);

        let entry = sessions.entry(session_key.to_string()).or_insert_with(|| SessionEntry {
            turns: Vec::new(),
            last_write: now,
        });
        entry.turns.push(turn);
        entry.last_write = now;

        debug!(
            session_key = %session_key,
            turn_count = entry.turns.len(),
            "Appended turn to session"
        );
        Ok(())
    }

    async fn recent(&self, session_key: &str, limit: usize) -> Result<Vec<Turn>, anyhow::Error> {
        let now = self.clock.now();
        let sessions = self.sessions.read().await;

        let turns = match sessions.get(session_key) {
            Some(entry) if !self.is_expired(entry, now) => {
                let start = entry.turns.len().saturating_sub(limit);
                entry.turns[start..].to_vec()
            }
            _ => Vec::new(),
        };

        debug!(
            session_key = %session_key,
            limit = limit,
            returned = turns.len(),
            "Read recent session history"
        );
        Ok(turns)
    }
}
