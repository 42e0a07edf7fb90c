use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session token (random UUID)
pub type SessionToken = String;

#[derive(Clone, Debug)]
pub struct Session {
    pub profile_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// In-memory session store; sessions expire `ttl` after creation.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionToken, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issues a new token. Expired sessions are pruned on the way.
    pub async fn create_session(&self, profile_id: Uuid) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| now.signed_duration_since(session.created_at) < self.ttl);
        sessions.insert(
            token.clone(),
            Session {
                profile_id,
                created_at: now,
            },
        );
        tracing::debug!(%profile_id, active = sessions.len(), "Session created");
        token
    }

    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;
        if self.is_expired(session) {
            return None;
        }
        Some(session.clone())
    }

    pub async fn delete_session(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    #[cfg(test)]
    async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, session: &Session) -> bool {
        Utc::now().signed_duration_since(session.created_at) >= self.ttl
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}
