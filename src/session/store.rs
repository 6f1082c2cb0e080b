//! Concurrent session storage with per-session locking

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{EngineError, GameResult};

use super::state::{Session, SessionId};

/// Concurrent keyed storage of live sessions.
///
/// The outer lock guards only the keyspace; every session carries its own
/// `RwLock`, so mutating operations on different sessions run in parallel
/// while two mutations of the same session are serialized by its writer
/// lock. The store is an explicit, constructed instance: separate engine
/// instances never share state.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<RwLock<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and return its shared handle.
    pub(crate) async fn insert(&self, session: Session) -> Arc<RwLock<Session>> {
        let session_id = session.id;
        let handle = Arc::new(RwLock::new(session));
        self.sessions
            .write()
            .await
            .insert(session_id, Arc::clone(&handle));
        debug!(session_id = %session_id, "session registered");
        handle
    }

    /// Look up a session handle.
    ///
    /// Fails with [`EngineError::SessionNotFound`] for unknown identifiers.
    pub(crate) async fn get(&self, session_id: SessionId) -> GameResult<Arc<RwLock<Session>>> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| EngineError::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop every session. Idempotent; used for deterministic teardown
    /// between engine instances.
    pub(crate) async fn clear(&self) {
        let mut sessions = self.sessions.write().await;
        let released = sessions.len();
        sessions.clear();
        debug!(released, "session store cleared");
    }
}
