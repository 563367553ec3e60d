//! Galleria Persistence Layer
//!
//! Provides:
//! - SQLite-backed durable key-value storage (favorites, theme)
//! - An in-memory fallback store

mod kv;
mod pool;
mod schema;

pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use pool::DbPool;
pub use schema::migrate;

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Get the database directory
pub fn db_dir() -> PathBuf {
    ProjectDirs::from("com", "Galleria", "Galleria")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Open the gallery store in the default data directory
pub fn init() -> Result<SqliteStore> {
    open_in(&db_dir())
}

/// Open (creating if needed) the gallery store inside `dir`
pub fn open_in(dir: &Path) -> Result<SqliteStore> {
    std::fs::create_dir_all(dir)?;

    let sqlite_path = dir.join("gallery.db");
    let pool = pool::init_pool(&sqlite_path)?;
    migrate(&pool)?;

    tracing::info!("Database initialized at {:?}", sqlite_path);
    Ok(SqliteStore::new(pool))
}
