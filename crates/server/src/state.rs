use std::sync::Arc;

use url::Url;

use crate::auth::SessionKeys;
use crate::database::{Database, DatabaseSetupError};
use crate::ServiceConfig;

/// Main service state - the database pool plus session signing material.
///
/// Cloning is cheap; one instance is shared across every request handler.
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    session_keys: Arc<SessionKeys>,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => Url::parse(&format!("sqlite://{}", path.display()))
                .map_err(|_| StateSetupError::InvalidDatabaseUrl),
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        let session_keys = match config.session_secret {
            Some(ref secret) if !secret.is_empty() => {
                SessionKeys::from_secret(secret.as_bytes())
            }
            _ => {
                tracing::warn!(
                    "no session secret configured, generating one; sessions will not survive a restart"
                );
                SessionKeys::generate()
            }
        };

        Ok(Self::new(database, session_keys))
    }

    pub fn new(database: Database, session_keys: SessionKeys) -> Self {
        Self {
            database,
            session_keys: Arc::new(session_keys),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn session_keys(&self) -> &SessionKeys {
        &self.session_keys
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("invalid database url")]
    InvalidDatabaseUrl,

    #[error("database setup error: {0}")]
    DatabaseSetup(#[from] DatabaseSetupError),
}
