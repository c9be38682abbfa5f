//! Connection pool for the preference database.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

/// The database holds a single row; a couple of connections are plenty.
const MAX_CONNECTIONS: u32 = 2;

/// Open the database at `database_url`, creating the file if needed, and
/// bring its schema up to date.
///
/// `sqlite::memory:` yields a private in-memory database shared by the
/// connections of the returned pool.
///
/// # Errors
///
/// Returns [`StorageError`] for a malformed URL, a connection failure or a
/// failed migration.
#[tracing::instrument]
pub async fn connect_and_migrate(database_url: &str) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!("preference schema ready");
    Ok(pool)
}
