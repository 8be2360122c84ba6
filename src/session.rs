//! Session issuance seam
//!
//! Successful outcomes are forwarded by the caller to a session issuer; the
//! transport of the resulting token (cookies, headers) is outside this crate.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand_core::{OsRng, RngCore};
use zeroize::Zeroize;

use crate::{Error, Result, UserRecord};

/// An issued session
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session id
    pub id: String,
    /// Owning user id
    pub user_id: String,
    /// Opaque bearer token
    pub token: String,
    /// Created timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Expiration timestamp
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Session issuance configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in seconds
    pub session_lifetime: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_lifetime: 3600 * 24, // 24 hours
        }
    }
}

/// Collaborator that turns a resolved user record into a session
pub trait SessionIssuer: Send + Sync {
    /// Issue a new session for an authenticated user
    fn issue(&self, user: &UserRecord) -> Result<Session>;

    /// Whether the session exists and has not expired
    fn validate(&self, session_id: &str) -> Result<bool>;

    /// Revoke a session
    fn revoke(&self, session_id: &str) -> Result<()>;
}

/// In-memory session issuer
pub struct InMemorySessionIssuer {
    sessions: std::sync::RwLock<BTreeMap<String, Session>>,
    config: SessionConfig,
}

impl InMemorySessionIssuer {
    /// Create a new issuer
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: std::sync::RwLock::new(BTreeMap::new()),
            config,
        }
    }

    fn generate_token() -> String {
        let mut bytes = vec![0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(&bytes)
    }
}

impl SessionIssuer for InMemorySessionIssuer {
    fn issue(&self, user: &UserRecord) -> Result<Session> {
        let now = chrono::Utc::now();
        // Saturate instead of wrapping on oversized lifetimes
        let lifetime = i64::try_from(self.config.session_lifetime).unwrap_or(i64::MAX);
        let expires_at = chrono::Duration::try_seconds(lifetime)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
        let session = Session {
            id: format!("sess_{}", uuid::Uuid::new_v4()),
            user_id: user.id.clone(),
            token: Self::generate_token(),
            created_at: now,
            expires_at,
        };

        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn validate(&self, session_id: &str) -> Result<bool> {
        let sessions = self.sessions.read().unwrap();
        if let Some(session) = sessions.get(session_id) {
            Ok(session.expires_at > chrono::Utc::now())
        } else {
            Ok(false)
        }
    }

    fn revoke(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(mut session) = sessions.remove(session_id) {
            session.token.zeroize();
            Ok(())
        } else {
            Err(Error::NotFound(format!("session {session_id} not found")))
        }
    }
}
