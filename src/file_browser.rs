//! Directory listing and folder creation, used to pick download targets.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Invalid folder name")]
    InvalidName,

    #[error("Already exists: {0:?}")]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct DirectoryListing {
    pub path: String,
    pub parent: Option<String>,
    pub entries: Vec<DirectoryEntry>,
}

/// Lists `dir` with directories first, then files, each sorted by name.
/// Hidden entries are skipped.
pub fn list_directory(dir: &Path) -> Result<DirectoryListing, BrowseError> {
    if !dir.is_dir() {
        return Err(BrowseError::NotADirectory(dir.to_path_buf()));
    }
    let dir = dir.canonicalize()?;

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        entries.push(DirectoryEntry {
            name,
            is_dir: path.is_dir(),
            path: path.to_string_lossy().to_string(),
        });
    }
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

    Ok(DirectoryListing {
        path: dir.to_string_lossy().to_string(),
        parent: dir.parent().map(|p| p.to_string_lossy().to_string()),
        entries,
    })
}

/// Creates `parent/name`. `name` must be exactly one normal path component.
pub fn create_folder(parent: &Path, name: &str) -> Result<PathBuf, BrowseError> {
    let name = name.trim();
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(BrowseError::InvalidName),
    }
    if !parent.is_dir() {
        return Err(BrowseError::NotADirectory(parent.to_path_buf()));
    }

    let target = parent.join(name);
    if target.exists() {
        return Err(BrowseError::AlreadyExists(target));
    }
    std::fs::create_dir(&target)?;
    Ok(target)
}
