//! In-memory review sessions keyed by id.
//!
//! Each session is mutated only while the store lock is held, so one request at a time
//! touches a given review.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::review::import::ImportReview;

#[derive(Debug, Clone)]
pub struct ReviewSession {
    pub review: ImportReview,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ReviewSessionStore {
    sessions: Mutex<HashMap<Uuid, ReviewSession>>,
    ttl: Duration,
}

impl ReviewSessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, session: &ReviewSession, now: DateTime<Utc>) -> bool {
        (now - session.updated_at)
            .to_std()
            .map(|idle| idle > self.ttl)
            .unwrap_or(false)
    }

    /// Stores a new review, pruning idle sessions first. Returns the session id.
    pub async fn create(&self, review: ImportReview) -> Uuid {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            info!(pruned, "Pruned idle review sessions");
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            ReviewSession {
                review,
                created_at: now,
                updated_at: now,
            },
        );
        debug!(session_id = %id, open = sessions.len(), "Opened review session");
        id
    }

    /// Drops the session if it has sat idle past the TTL.
    fn evict_if_expired(
        &self,
        sessions: &mut HashMap<Uuid, ReviewSession>,
        id: Uuid,
        now: DateTime<Utc>,
    ) {
        if sessions.get(&id).is_some_and(|s| self.is_expired(s, now)) {
            sessions.remove(&id);
            debug!(session_id = %id, "Expired idle review session");
        }
    }

    /// Runs `f` against the session under the store lock and refreshes its idle timer.
    /// Sessions idle past the TTL are gone even if no prune has run yet.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ReviewSession) -> R,
    ) -> Result<R, AppError> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        self.evict_if_expired(&mut sessions, id, now);
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        session.updated_at = now;
        Ok(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<ReviewSession, AppError> {
        let mut sessions = self.sessions.lock().await;
        self.evict_if_expired(&mut sessions, id, Utc::now());
        sessions.remove(&id).ok_or_else(|| not_found(id))
    }

    pub async fn open_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Review session {id} not found"))
}
