use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use downloader_server::config::DB_FILE_NAME;
use downloader_server::{Database, SqliteUserStore, UserManager};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite database, defaults to `$DATA_DIR/downloader.db`.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Creates a user with the given username and password.
    AddUser { username: String, password: String },

    /// Replaces the password of a user and revokes all of their sessions.
    UpdatePassword { username: String, password: String },

    /// Verifies a password against the stored hash.
    CheckPassword { username: String, password: String },

    /// Lists all usernames.
    ListUsers,

    /// Deletes a user together with their sessions.
    DeleteUser { username: String },

    /// Removes every expired session.
    PruneSessions,
}

fn resolve_db_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }
    match std::env::var_os("DATA_DIR") {
        Some(dir) => Ok(PathBuf::from(dir).join(DB_FILE_NAME)),
        None => bail!("Could not infer the database path, pass --db-path or set DATA_DIR."),
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let db_path = resolve_db_path(cli_args.db_path)?;
    let db = Database::open(&db_path)?;
    let user_manager = UserManager::new(Arc::new(SqliteUserStore::new(db)));

    match cli_args.command {
        Command::AddUser { username, password } => {
            let id = user_manager.add_user(&username, &password)?;
            println!("Created user {} with id {}", username, id);
        }
        Command::UpdatePassword { username, password } => {
            user_manager.set_password(&username, &password)?;
            println!("Password updated for {}", username);
        }
        Command::CheckPassword { username, password } => {
            if user_manager.check_password(&username, &password)? {
                println!("Password is correct.");
            } else {
                println!("Password is NOT correct.");
            }
        }
        Command::ListUsers => {
            for user in user_manager.list_users()? {
                println!("{}\t{}\t{}", user.id, user.username, user.created_at);
            }
        }
        Command::DeleteUser { username } => {
            if user_manager.delete_user(&username)? {
                println!("Deleted {}", username);
            } else {
                bail!("No such user: {}", username);
            }
        }
        Command::PruneSessions => {
            let count = user_manager.prune_expired_sessions()?;
            println!("Pruned {} expired sessions", count);
        }
    }
    Ok(())
}
