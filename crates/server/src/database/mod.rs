mod account_queries;
mod sqlite;

pub use account_queries::{AccountStoreError, SettingsRecord};

use std::ops::Deref;

use sqlx::SqlitePool;

/// Connection pool for the credential store.
///
/// The pool is the only shared mutable resource in the service; every
/// multi-step operation against it runs inside a single transaction.
#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    pub async fn connect(database_url: &url::Url) -> Result<Self, DatabaseSetupError> {
        if database_url.scheme() == "sqlite" {
            let db = sqlite::connect_sqlite(database_url).await?;
            sqlite::migrate_sqlite(&db).await?;
            return Ok(Database::new(db));
        }

        Err(DatabaseSetupError::UnknownDbType(
            database_url.scheme().to_string(),
        ))
    }

    /// Connect to an in-memory database, for tests.
    pub async fn memory() -> Result<Self, DatabaseSetupError> {
        let url = url::Url::parse("sqlite::memory:").expect("valid in-memory sqlite url");
        Self::connect(&url).await
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    /// Cheap liveness probe used by the readiness endpoint.
    pub async fn is_ready(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.0).await?;
        Ok(())
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(sqlx::Error),

    #[error("requested database type was not recognized: {0}")]
    UnknownDbType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vaultkeep.db");
        let db_url = url::Url::parse(&format!("sqlite://{}", path.display())).unwrap();

        let db = Database::connect(&db_url).await.unwrap();
        db.is_ready().await.unwrap();
        db.create_account("alice", "tok123").await.unwrap();
        drop(db);

        // Reconnect and observe the persisted account; migrations are
        // idempotent across connects.
        let db = Database::connect(&db_url).await.unwrap();
        assert!(db.account_exists("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_unknown_scheme() {
        let db_url = url::Url::parse("postgres://localhost/vaultkeep").unwrap();
        assert!(matches!(
            Database::connect(&db_url).await,
            Err(DatabaseSetupError::UnknownDbType(_))
        ));
    }
}
