//! Tables of the downloader database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const USERS_TABLE_V1: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("password_hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!("created_at", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const SESSION_USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SESSIONS_TABLE_V1: Table = Table {
    name: "sessions",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SESSION_USER_FK)
        ),
        sqlite_column!("token", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("created_at", &SqlType::Text, non_null = true),
        sqlite_column!("expires_at", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_sessions_user_id", "user_id"),
        ("idx_sessions_expires_at", "expires_at"),
    ],
};

/// One row per requested download. Everything after `status` is written by the
/// worker that consumes pending rows.
const DOWNLOADS_TABLE_V1: Table = Table {
    name: "downloads",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("url", &SqlType::Text, non_null = true),
        sqlite_column!("filename", &SqlType::Text),
        sqlite_column!("custom_filename", &SqlType::Text),
        sqlite_column!("target_path", &SqlType::Text),
        sqlite_column!(
            "status",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'pending'")
        ),
        sqlite_column!(
            "progress",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("size", &SqlType::Integer),
        sqlite_column!("speed", &SqlType::Integer),
        sqlite_column!("eta", &SqlType::Integer),
        sqlite_column!("error", &SqlType::Text),
        sqlite_column!("created_at", &SqlType::Text, non_null = true),
        sqlite_column!("updated_at", &SqlType::Text),
    ],
    indices: &[("idx_downloads_created_at", "created_at DESC, id DESC")],
};

const SETTINGS_TABLE_V1: Table = Table {
    name: "settings",
    columns: &[
        sqlite_column!("key", &SqlType::Text, is_primary_key = true),
        sqlite_column!("value", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const PATHS_TABLE_V1: Table = Table {
    name: "paths",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("path", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

pub const APP_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[
        USERS_TABLE_V1,
        SESSIONS_TABLE_V1,
        DOWNLOADS_TABLE_V1,
        SETTINGS_TABLE_V1,
        PATHS_TABLE_V1,
    ],
    migration: None,
}];
