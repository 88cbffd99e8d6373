pub mod auth;
mod sqlite_user_store;
mod user_manager;
mod user_models;
mod user_store;

pub use auth::{PasswordHasherKind, SessionToken};
pub use sqlite_user_store::SqliteUserStore;
pub use user_manager::{AuthError, AuthenticatedSession, UserManager};
pub use user_models::*;
pub use user_store::{FullUserStore, SessionStore, UserCredentialsStore, UserStore};
