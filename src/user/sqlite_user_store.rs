use super::auth::{PasswordHasherKind, SessionToken};
use super::user_models::{Session, User, UserCredentials};
use super::user_store::{SessionStore, UserCredentialsStore, UserStore};
use crate::sqlite_persistence::{format_timestamp, parse_timestamp, Database};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::str::FromStr;

pub struct SqliteUserStore {
    db: Database,
}

impl SqliteUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at: String = row.get("created_at")?;
        Ok(User {
            id: row.get("id")?,
            username: row.get("username")?,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<Session> {
        let created_at: String = row.get("created_at")?;
        let expires_at: String = row.get("expires_at")?;
        Ok(Session {
            user_id: row.get("user_id")?,
            token: SessionToken(row.get("token")?),
            created_at: parse_timestamp(&created_at)?,
            expires_at: parse_timestamp(&expires_at)?,
        })
    }
}

impl UserStore for SqliteUserStore {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        hasher: PasswordHasherKind,
    ) -> Result<i64> {
        let conn = self.db.lock()?;
        let exists = conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?1",
                params![username],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            bail!("User {} already exists", username);
        }

        conn.execute(
            "INSERT INTO users (username, password_hash, hasher, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                username,
                password_hash,
                hasher.to_string(),
                format_timestamp(&Utc::now())
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.db.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE id = ?1",
                params![user_id],
                Self::row_to_user,
            )
            .optional()?)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.db.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, username, created_at FROM users WHERE username = ?1",
                params![username],
                Self::row_to_user,
            )
            .optional()?)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare("SELECT id, username, created_at FROM users ORDER BY username")?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    fn delete_user(&self, user_id: i64) -> Result<bool> {
        let conn = self.db.lock()?;
        Ok(conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])? > 0)
    }
}

impl UserCredentialsStore for SqliteUserStore {
    fn get_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        let conn = self.db.lock()?;
        let row = conn
            .query_row(
                "SELECT id, password_hash, hasher FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((user_id, password_hash, hasher)) => Ok(Some(UserCredentials {
                user_id,
                password_hash,
                hasher: PasswordHasherKind::from_str(&hasher)?,
            })),
        }
    }

    fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
        hasher: PasswordHasherKind,
    ) -> Result<()> {
        let conn = self.db.lock()?;
        let updated = conn.execute(
            "UPDATE users SET password_hash = ?1, hasher = ?2 WHERE id = ?3",
            params![password_hash, hasher.to_string(), user_id],
        )?;
        if updated == 0 {
            bail!("User {} not found", user_id);
        }
        Ok(())
    }
}

impl SessionStore for SqliteUserStore {
    fn insert_session(&self, session: &Session) -> Result<()> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO sessions (user_id, token, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.user_id,
                session.token.as_str(),
                format_timestamp(&session.created_at),
                format_timestamp(&session.expires_at),
            ],
        )?;
        Ok(())
    }

    fn get_session(&self, token: &SessionToken) -> Result<Option<Session>> {
        let conn = self.db.lock()?;
        Ok(conn
            .query_row(
                "SELECT user_id, token, created_at, expires_at FROM sessions WHERE token = ?1",
                params![token.as_str()],
                Self::row_to_session,
            )
            .optional()?)
    }

    fn delete_session(&self, token: &SessionToken) -> Result<bool> {
        let conn = self.db.lock()?;
        Ok(conn.execute(
            "DELETE FROM sessions WHERE token = ?1",
            params![token.as_str()],
        )? > 0)
    }

    fn delete_user_sessions(&self, user_id: i64, keep: Option<&SessionToken>) -> Result<usize> {
        let conn = self.db.lock()?;
        let deleted = match keep {
            Some(token) => conn.execute(
                "DELETE FROM sessions WHERE user_id = ?1 AND token != ?2",
                params![user_id, token.as_str()],
            )?,
            None => conn.execute(
                "DELETE FROM sessions WHERE user_id = ?1",
                params![user_id],
            )?,
        };
        Ok(deleted)
    }

    fn delete_sessions_expired_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let conn = self.db.lock()?;
        Ok(conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![format_timestamp(&now)],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    struct TestStore {
        store: SqliteUserStore,
        _temp_dir: TempDir,
    }

    fn create_test_store() -> TestStore {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("users.db")).unwrap();
        TestStore {
            store: SqliteUserStore::new(db),
            _temp_dir: temp_dir,
        }
    }

    fn add_user(store: &SqliteUserStore, username: &str) -> i64 {
        store
            .create_user(username, "$argon2id$fake", PasswordHasherKind::Argon2)
            .unwrap()
    }

    #[test]
    fn creates_and_finds_users() {
        let test = create_test_store();
        let id = add_user(&test.store, "alice");

        let user = test.store.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(test.store.get_user(id).unwrap(), Some(user));
        assert!(test.store.get_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn rejects_duplicate_username() {
        let test = create_test_store();
        add_user(&test.store, "alice");
        let err = test
            .store
            .create_user("alice", "other", PasswordHasherKind::Argon2)
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn reads_and_updates_credentials() {
        let test = create_test_store();
        let id = add_user(&test.store, "alice");

        let creds = test.store.get_credentials("alice").unwrap().unwrap();
        assert_eq!(creds.user_id, id);
        assert_eq!(creds.password_hash, "$argon2id$fake");
        assert_eq!(creds.hasher, PasswordHasherKind::Argon2);

        test.store
            .update_password_hash(id, "$argon2id$new", PasswordHasherKind::Argon2)
            .unwrap();
        let creds = test.store.get_credentials("alice").unwrap().unwrap();
        assert_eq!(creds.password_hash, "$argon2id$new");

        assert!(test
            .store
            .update_password_hash(999, "x", PasswordHasherKind::Argon2)
            .is_err());
    }

    #[test]
    fn session_round_trip_and_delete() {
        let test = create_test_store();
        let id = add_user(&test.store, "alice");
        let session = Session::new(id, Utc::now());

        test.store.insert_session(&session).unwrap();
        let loaded = test.store.get_session(&session.token).unwrap().unwrap();
        assert_eq!(loaded.user_id, id);
        assert_eq!(loaded.token, session.token);
        assert_eq!(loaded.expires_at - loaded.created_at, Duration::days(30));

        assert!(test.store.delete_session(&session.token).unwrap());
        assert!(!test.store.delete_session(&session.token).unwrap());
        assert!(test.store.get_session(&session.token).unwrap().is_none());
    }

    #[test]
    fn deleting_user_cascades_to_sessions() {
        let test = create_test_store();
        let id = add_user(&test.store, "alice");
        let session = Session::new(id, Utc::now());
        test.store.insert_session(&session).unwrap();

        assert!(test.store.delete_user(id).unwrap());
        assert!(test.store.get_session(&session.token).unwrap().is_none());
    }

    #[test]
    fn deletes_other_sessions_of_user() {
        let test = create_test_store();
        let alice = add_user(&test.store, "alice");
        let bob = add_user(&test.store, "bob");
        let now = Utc::now();
        let keep = Session::new(alice, now);
        let drop_me = Session::new(alice, now);
        let bobs = Session::new(bob, now);
        for s in [&keep, &drop_me, &bobs] {
            test.store.insert_session(s).unwrap();
        }

        let deleted = test
            .store
            .delete_user_sessions(alice, Some(&keep.token))
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(test.store.get_session(&keep.token).unwrap().is_some());
        assert!(test.store.get_session(&drop_me.token).unwrap().is_none());
        assert!(test.store.get_session(&bobs.token).unwrap().is_some());
    }

    #[test]
    fn prunes_only_expired_sessions() {
        let test = create_test_store();
        let id = add_user(&test.store, "alice");
        let now = Utc::now();
        let old = Session::new(id, now - Duration::days(31));
        let fresh = Session::new(id, now);
        test.store.insert_session(&old).unwrap();
        test.store.insert_session(&fresh).unwrap();

        assert_eq!(test.store.delete_sessions_expired_at(now).unwrap(), 1);
        assert!(test.store.get_session(&old.token).unwrap().is_none());
        assert!(test.store.get_session(&fresh.token).unwrap().is_some());
    }

    #[test]
    fn lists_users_by_name() {
        let test = create_test_store();
        add_user(&test.store, "zed");
        add_user(&test.store, "amy");
        let names: Vec<String> = test
            .store
            .list_users()
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }
}
