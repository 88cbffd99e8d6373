use super::auth::{PasswordHasherKind, SessionToken};
use super::user_models::{Session, User, UserCredentials};
use anyhow::Result;
use chrono::{DateTime, Utc};

pub trait UserStore: Send + Sync {
    /// Creates a user and returns its id. Fails if the username is taken.
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        hasher: PasswordHasherKind,
    ) -> Result<i64>;

    fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// All users ordered by username.
    fn list_users(&self) -> Result<Vec<User>>;

    /// Deletes the user and, through the foreign key, all of its sessions.
    fn delete_user(&self, user_id: i64) -> Result<bool>;
}

pub trait UserCredentialsStore: Send + Sync {
    fn get_credentials(&self, username: &str) -> Result<Option<UserCredentials>>;

    fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
        hasher: PasswordHasherKind,
    ) -> Result<()>;
}

pub trait SessionStore: Send + Sync {
    fn insert_session(&self, session: &Session) -> Result<()>;

    /// Returns the session regardless of expiry; callers decide validity.
    fn get_session(&self, token: &SessionToken) -> Result<Option<Session>>;

    /// Returns whether a row was removed.
    fn delete_session(&self, token: &SessionToken) -> Result<bool>;

    /// Deletes every session of `user_id` except `keep`, if given.
    fn delete_user_sessions(&self, user_id: i64, keep: Option<&SessionToken>) -> Result<usize>;

    fn delete_sessions_expired_at(&self, now: DateTime<Utc>) -> Result<usize>;
}

pub trait FullUserStore: UserStore + UserCredentialsStore + SessionStore {}

impl<T: UserStore + UserCredentialsStore + SessionStore> FullUserStore for T {}
