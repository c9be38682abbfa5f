//! `SQLite` implementation of [`PreferenceStore`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use powerhub_app::ports::PreferenceStore;
use powerhub_domain::error::PowerHubError;
use powerhub_domain::preferences::DisplayPreferences;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`DisplayPreferences`].
struct Wrapper(DisplayPreferences);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let relative_arc_mode: bool = row.try_get("relative_arc_mode")?;
        let max_power: f64 = row.try_get("max_power")?;

        let preferences = DisplayPreferences {
            relative_arc_mode,
            max_power,
        };
        preferences
            .validate()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(preferences))
    }
}

const SELECT: &str = "SELECT relative_arc_mode, max_power FROM display_preferences WHERE id = 1";
const UPSERT: &str = "\
     INSERT INTO display_preferences (id, relative_arc_mode, max_power, updated_at) \
     VALUES (1, ?, ?, ?) \
     ON CONFLICT (id) DO UPDATE SET \
     relative_arc_mode = excluded.relative_arc_mode, \
     max_power = excluded.max_power, \
     updated_at = excluded.updated_at";

/// `SQLite`-backed display preference store.
///
/// Keeps a single row; every save replaces it.
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn load(
        &self,
    ) -> impl Future<Output = Result<Option<DisplayPreferences>, PowerHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn save(
        &self,
        preferences: DisplayPreferences,
    ) -> impl Future<Output = Result<(), PowerHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(preferences.relative_arc_mode)
                .bind(preferences.max_power)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            tracing::debug!(
                relative = preferences.relative_arc_mode,
                max_power = preferences.max_power,
                "saved display preferences"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::connect_and_migrate;

    async fn setup() -> SqlitePreferenceStore {
        SqlitePreferenceStore::new(connect_and_migrate("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn should_return_none_before_first_save() {
        let store = setup().await;
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_load_saved_preferences() {
        let store = setup().await;
        let prefs = DisplayPreferences {
            relative_arc_mode: true,
            max_power: 7250.5,
        };

        store.save(prefs).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(prefs));
    }

    #[tokio::test]
    async fn should_replace_previous_preferences() {
        let store = setup().await;
        store
            .save(DisplayPreferences {
                relative_arc_mode: true,
                max_power: 9000.0,
            })
            .await
            .unwrap();
        let latest = DisplayPreferences {
            relative_arc_mode: false,
            max_power: 5000.0,
        };

        store.save(latest).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(latest));
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM display_preferences")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn should_reject_corrupted_row() {
        let store = setup().await;
        sqlx::query(
            "INSERT INTO display_preferences (id, relative_arc_mode, max_power, updated_at) \
             VALUES (1, 1, -5.0, '')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        assert!(matches!(
            store.load().await,
            Err(PowerHubError::Storage(_))
        ));
    }
}
