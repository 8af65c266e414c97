pub mod dataset;
pub mod history;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

// Path relative to crates/pricetrack-db/Cargo.toml; resolves to
// <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("dataset io error: {0}")]
    DatasetIo(#[from] std::io::Error),
}

/// Opens (creating if missing) the SQLite history database at `path` and
/// applies pending migrations.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be opened or a migration fails.
pub async fn connect_pool(path: &Path) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// In-memory pool for tests; same schema as the on-disk database.
///
/// # Errors
///
/// Returns [`DbError`] if the pool cannot be created or a migration fails.
pub async fn connect_memory_pool() -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::new().in_memory(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}
