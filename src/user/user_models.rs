use super::auth::{PasswordHasherKind, SessionToken};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::Serialize;

/// How long a session stays valid after login.
pub const SESSION_TTL_DAYS: i64 = 30;

pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Stored password material. Never leaves the server.
#[derive(Clone, Debug)]
pub struct UserCredentials {
    pub user_id: i64,
    pub password_hash: String,
    pub hasher: PasswordHasherKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub token: SessionToken,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Timestamps are cut to milliseconds, the precision they are stored with.
    pub fn new(user_id: i64, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            user_id,
            token: SessionToken::generate(),
            created_at: now,
            expires_at: now + session_ttl(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
