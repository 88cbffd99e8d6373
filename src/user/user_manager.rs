use super::auth::{verify_against_dummy, SessionToken, DEFAULT_HASHER};
use super::user_models::{Session, User};
use super::user_store::FullUserStore;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A session that exists and has not expired, with its owner.
#[derive(Clone, Debug)]
pub struct AuthenticatedSession {
    pub user: User,
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}

pub struct UserManager {
    store: Arc<dyn FullUserStore>,
}

impl UserManager {
    pub fn new(store: Arc<dyn FullUserStore>) -> Self {
        Self { store }
    }

    pub fn add_user(&self, username: &str, password: &str) -> Result<i64> {
        let username = username.trim();
        if username.is_empty() {
            bail!("Username cannot be empty");
        }
        if password.is_empty() {
            bail!("Password cannot be empty");
        }
        let hash = DEFAULT_HASHER.hash(password)?;
        let user_id = self.store.create_user(username, &hash, DEFAULT_HASHER)?;
        info!("Created user {} with id {}", username, user_id);
        Ok(user_id)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.store.list_users()
    }

    pub fn delete_user(&self, username: &str) -> Result<bool> {
        match self.store.get_user_by_username(username)? {
            Some(user) => self.store.delete_user(user.id),
            None => Ok(false),
        }
    }

    /// Checks a password without creating a session.
    pub fn check_password(&self, username: &str, password: &str) -> Result<bool> {
        match self.store.get_credentials(username)? {
            Some(credentials) => credentials
                .hasher
                .verify(password, &credentials.password_hash),
            None => {
                verify_against_dummy(password);
                Ok(false)
            }
        }
    }

    /// Replaces the password and revokes all sessions of the user.
    pub fn set_password(&self, username: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            bail!("Password cannot be empty");
        }
        let user = self
            .store
            .get_user_by_username(username)?
            .with_context(|| format!("User {} not found", username))?;
        let hash = DEFAULT_HASHER.hash(new_password)?;
        self.store
            .update_password_hash(user.id, &hash, DEFAULT_HASHER)?;
        self.store.delete_user_sessions(user.id, None)?;
        Ok(())
    }

    pub fn login(&self, username: &str, password: &str) -> Result<(User, Session), AuthError> {
        if !self.check_password(username, password)? {
            debug!("Rejected login for {}", username);
            return Err(AuthError::InvalidCredentials);
        }
        let user = self
            .store
            .get_user_by_username(username)?
            .ok_or(AuthError::InvalidCredentials)?;

        let session = Session::new(user.id, Utc::now());
        self.store.insert_session(&session)?;
        info!("User {} logged in", user.username);
        Ok((user, session))
    }

    /// Unknown tokens are ignored.
    pub fn logout(&self, token: &SessionToken) -> Result<()> {
        if !self.store.delete_session(token)? {
            debug!("Logout for unknown session {:?}", token);
        }
        Ok(())
    }

    /// Resolves a token to its live session. Expired sessions are deleted and
    /// treated as absent.
    pub fn validate_session(&self, token: &SessionToken) -> Result<Option<AuthenticatedSession>> {
        let Some(session) = self.store.get_session(token)? else {
            return Ok(None);
        };
        if session.is_expired_at(Utc::now()) {
            debug!("Session {:?} expired at {}", token, session.expires_at);
            self.store.delete_session(token)?;
            return Ok(None);
        }
        let Some(user) = self.store.get_user(session.user_id)? else {
            warn!("Session {:?} points to missing user {}", token, session.user_id);
            return Ok(None);
        };
        Ok(Some(AuthenticatedSession {
            user,
            token: session.token,
            expires_at: session.expires_at,
        }))
    }

    /// Verifies `current_password`, stores the new one and revokes every
    /// other session of the user.
    pub fn change_password(
        &self,
        session: &AuthenticatedSession,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::Validation("New password cannot be empty"));
        }
        if !self.check_password(&session.user.username, current_password)? {
            return Err(AuthError::InvalidCredentials);
        }
        let hash = DEFAULT_HASHER.hash(new_password)?;
        self.store
            .update_password_hash(session.user.id, &hash, DEFAULT_HASHER)?;
        let revoked = self
            .store
            .delete_user_sessions(session.user.id, Some(&session.token))?;
        info!(
            "Password changed for {}, revoked {} other sessions",
            session.user.username, revoked
        );
        Ok(())
    }

    pub fn prune_expired_sessions(&self) -> Result<usize> {
        self.store.delete_sessions_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite_persistence::Database;
    use crate::user::{SessionStore, SqliteUserStore};
    use chrono::Duration;
    use tempfile::TempDir;

    struct TestManager {
        manager: UserManager,
        store: Arc<SqliteUserStore>,
        db: Database,
        _temp_dir: TempDir,
    }

    fn create_manager() -> TestManager {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("users.db")).unwrap();
        let store = Arc::new(SqliteUserStore::new(db.clone()));
        TestManager {
            manager: UserManager::new(store.clone()),
            store,
            db,
            _temp_dir: temp_dir,
        }
    }

    fn session_count(db: &Database) -> i64 {
        db.lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn login_issues_thirty_day_session() {
        let test = create_manager();
        test.manager.add_user("alice", "s3cret").unwrap();

        let before = Utc::now();
        let (user, session) = test.manager.login("alice", "s3cret").unwrap();
        let after = Utc::now();

        assert_eq!(user.username, "alice");
        assert_eq!(session.expires_at - session.created_at, Duration::days(30));
        assert!(session.expires_at >= before + Duration::days(30));
        assert!(session.expires_at <= after + Duration::days(30));
        assert_eq!(session_count(&test.db), 1);
    }

    #[test]
    fn wrong_password_creates_no_session() {
        let test = create_manager();
        test.manager.add_user("alice", "s3cret").unwrap();

        assert!(matches!(
            test.manager.login("alice", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            test.manager.login("mallory", "s3cret"),
            Err(AuthError::InvalidCredentials)
        ));
        assert_eq!(session_count(&test.db), 0);
    }

    #[test]
    fn logout_removes_session_and_ignores_unknown_tokens() {
        let test = create_manager();
        test.manager.add_user("alice", "s3cret").unwrap();
        let (_, session) = test.manager.login("alice", "s3cret").unwrap();
        let (_, other) = test.manager.login("alice", "s3cret").unwrap();

        test.manager
            .logout(&SessionToken("unknown".to_string()))
            .unwrap();
        assert_eq!(session_count(&test.db), 2);

        test.manager.logout(&session.token).unwrap();
        assert_eq!(session_count(&test.db), 1);
        assert!(test.manager.validate_session(&session.token).unwrap().is_none());
        assert!(test.manager.validate_session(&other.token).unwrap().is_some());
    }

    #[test]
    fn expired_session_is_rejected_and_removed() {
        let test = create_manager();
        let user_id = test.manager.add_user("alice", "s3cret").unwrap();
        let expired = Session::new(user_id, Utc::now() - Duration::days(30) - Duration::seconds(1));
        test.store.insert_session(&expired).unwrap();

        assert!(test.manager.validate_session(&expired.token).unwrap().is_none());
        assert_eq!(session_count(&test.db), 0);
    }

    #[test]
    fn validate_session_returns_owner() {
        let test = create_manager();
        test.manager.add_user("alice", "s3cret").unwrap();
        let (_, session) = test.manager.login("alice", "s3cret").unwrap();

        let authenticated = test
            .manager
            .validate_session(&session.token)
            .unwrap()
            .unwrap();
        assert_eq!(authenticated.user.username, "alice");
        assert_eq!(authenticated.expires_at, session.expires_at);
    }

    #[test]
    fn change_password_requires_current_and_revokes_others() {
        let test = create_manager();
        test.manager.add_user("alice", "old").unwrap();
        let (_, current) = test.manager.login("alice", "old").unwrap();
        let (_, other) = test.manager.login("alice", "old").unwrap();
        let authenticated = test
            .manager
            .validate_session(&current.token)
            .unwrap()
            .unwrap();

        assert!(matches!(
            test.manager.change_password(&authenticated, "wrong", "new"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            test.manager.change_password(&authenticated, "old", ""),
            Err(AuthError::Validation(_))
        ));

        test.manager
            .change_password(&authenticated, "old", "new")
            .unwrap();
        assert!(test.manager.check_password("alice", "new").unwrap());
        assert!(!test.manager.check_password("alice", "old").unwrap());
        assert!(test.manager.validate_session(&current.token).unwrap().is_some());
        assert!(test.manager.validate_session(&other.token).unwrap().is_none());
    }

    #[test]
    fn set_password_revokes_all_sessions() {
        let test = create_manager();
        test.manager.add_user("alice", "old").unwrap();
        test.manager.login("alice", "old").unwrap();

        test.manager.set_password("alice", "new").unwrap();
        assert_eq!(session_count(&test.db), 0);
        assert!(test.manager.login("alice", "new").is_ok());
        assert!(test.manager.set_password("nobody", "x").is_err());
    }

    #[test]
    fn add_user_validates_input() {
        let test = create_manager();
        assert!(test.manager.add_user("  ", "pw").is_err());
        assert!(test.manager.add_user("alice", "").is_err());
        test.manager.add_user("alice", "pw").unwrap();
        assert!(test.manager.add_user("alice", "pw").is_err());
    }

    #[test]
    fn prune_removes_expired_sessions() {
        let test = create_manager();
        let user_id = test.manager.add_user("alice", "pw").unwrap();
        test.store
            .insert_session(&Session::new(user_id, Utc::now() - Duration::days(40)))
            .unwrap();
        test.manager.login("alice", "pw").unwrap();

        assert_eq!(test.manager.prune_expired_sessions().unwrap(), 1);
        assert_eq!(session_count(&test.db), 1);
    }
}
