// src/session.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// One logged-in user; handed to request handlers after token lookup.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Token-keyed session store over the static credential table.
///
/// Sessions are process-local and die with the server; there is no TTL
/// beyond explicit logout.
pub struct SessionStore {
    users: HashMap<String, String>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self {
            users,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Check credentials against the static table; on success mint a
    /// session token.
    pub async fn login(&self, username: &str, password: &str) -> Option<String> {
        let expected = self.users.get(username)?;
        if expected != password {
            return None;
        }

        let token = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.sessions.write().await.insert(token.clone(), session);
        info!("Session opened for {}", username);
        Some(token)
    }

    pub async fn authorize(&self, token: &str) -> Option<Session> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn logout(&self, token: &str) -> bool {
        match self.sessions.write().await.remove(token) {
            Some(session) => {
                info!("Session closed for {}", session.username);
                true
            }
            None => false,
        }
    }
}
