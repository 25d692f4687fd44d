//! Transactional account, vault, and settings queries.
//!
//! Every operation that pairs an existence check with a mutation runs inside
//! a single transaction (or a single atomic statement), so a concurrent
//! delete or re-register cannot slip between check and act. The `UNIQUE`
//! constraint on `accounts.username` is the final backstop behind the
//! in-transaction duplicate check.
//!
//! `master_token` and `vault` are opaque strings to this layer: they are
//! stored and compared byte-for-byte, never parsed and never logged.

use serde::{Deserialize, Serialize};
use sqlx::Row;

use super::Database;

/// Per-account settings row.
///
/// `auto_lock_time_interval` doubles as the session credential lifetime in
/// seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub auto_lock_time_interval: i64,
    pub auto_lock_on_site_refresh: bool,
}

/// Errors that can occur while mutating the account store.
#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    #[error("username already taken")]
    UsernameTaken,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Database {
    /// Create an account with its default settings row, atomically.
    ///
    /// Returns the default `auto_lock_time_interval` so the caller can mint
    /// a session credential without a second round-trip. If either insert
    /// fails the transaction rolls back and neither row persists.
    pub async fn create_account(
        &self,
        username: &str,
        master_token: &str,
    ) -> Result<i64, AccountStoreError> {
        let mut tx = self.begin().await?;

        let existing = sqlx::query("SELECT 1 FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(AccountStoreError::UsernameTaken);
        }

        let now = chrono::Utc::now().timestamp();
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (username, master_token, created_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(master_token)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            // Raced another registration past the check above.
            Some(db_err) if db_err.is_unique_violation() => AccountStoreError::UsernameTaken,
            _ => AccountStoreError::Database(e),
        })?;
        let account_id: i64 = row.get("id");

        let row = sqlx::query(
            r#"
            INSERT INTO settings (account_id)
            VALUES (?)
            RETURNING auto_lock_time_interval
            "#,
        )
        .bind(account_id)
        .fetch_one(&mut *tx)
        .await?;
        let auto_lock_time_interval: i64 = row.get("auto_lock_time_interval");

        tx.commit().await?;
        Ok(auto_lock_time_interval)
    }

    /// Match a username and master token in a single lookup.
    ///
    /// Returns the account's `auto_lock_time_interval` on success. `None`
    /// is deliberately the same whether the username is unknown or the
    /// token is wrong, so callers cannot enumerate usernames.
    pub async fn verify_credentials(
        &self,
        username: &str,
        master_token: &str,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT s.auto_lock_time_interval
            FROM accounts a
            INNER JOIN settings s ON s.account_id = a.id
            WHERE a.username = ? AND a.master_token = ?
            "#,
        )
        .bind(username)
        .bind(master_token)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| r.get("auto_lock_time_interval")))
    }

    /// Check whether an account still exists, used on every verified request.
    pub async fn account_exists(&self, username: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&**self)
            .await?;
        Ok(row.is_some())
    }

    /// Fetch the stored vault blob.
    ///
    /// Outer `None` means the account is gone; inner `None` means the
    /// account exists but has not uploaded a blob yet.
    pub async fn vault(&self, username: &str) -> Result<Option<Option<String>>, sqlx::Error> {
        let row = sqlx::query("SELECT vault FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&**self)
            .await?;

        Ok(row.map(|r| r.get("vault")))
    }

    /// Overwrite the vault blob; a single atomic statement, so the
    /// existence check and the write cannot be interleaved.
    ///
    /// Returns `false` when no account matches.
    pub async fn put_vault(&self, username: &str, vault: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE accounts SET vault = ? WHERE username = ?")
            .bind(vault)
            .bind(username)
            .execute(&**self)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the account; the settings row goes with it via `ON DELETE
    /// CASCADE`. Returns `false` when no account matches.
    pub async fn delete_account(&self, username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE username = ?")
            .bind(username)
            .execute(&**self)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch the settings row for an account.
    pub async fn settings(&self, username: &str) -> Result<Option<SettingsRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT s.auto_lock_time_interval, s.auto_lock_on_site_refresh
            FROM accounts a
            INNER JOIN settings s ON s.account_id = a.id
            WHERE a.username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(|r| SettingsRecord {
            auto_lock_time_interval: r.get("auto_lock_time_interval"),
            auto_lock_on_site_refresh: r.get::<i64, _>("auto_lock_on_site_refresh") != 0,
        }))
    }

    /// Update the settings row; the account lookup and the write happen in
    /// one statement. Returns `false` when no account matches.
    pub async fn put_settings(
        &self,
        username: &str,
        settings: &SettingsRecord,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE settings
            SET auto_lock_time_interval = ?, auto_lock_on_site_refresh = ?
            WHERE account_id = (SELECT id FROM accounts WHERE username = ?)
            "#,
        )
        .bind(settings.auto_lock_time_interval)
        .bind(settings.auto_lock_on_site_refresh as i64)
        .bind(username)
        .execute(&**self)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
impl Database {
    /// Count account rows.
    pub async fn count_accounts(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM accounts")
            .fetch_one(&**self)
            .await?;
        Ok(row.get("count"))
    }

    /// Count settings rows.
    pub async fn count_settings(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM settings")
            .fetch_one(&**self)
            .await?;
        Ok(row.get("count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_account_with_default_settings() {
        let db = Database::memory().await.unwrap();

        let interval = db.create_account("alice", "tok123").await.unwrap();
        assert_eq!(interval, 600);

        let settings = db.settings("alice").await.unwrap().unwrap();
        assert_eq!(settings.auto_lock_time_interval, 600);
        assert!(settings.auto_lock_on_site_refresh);

        assert_eq!(db.count_accounts().await.unwrap(), 1);
        assert_eq!(db.count_settings().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected_and_rolls_back() {
        let db = Database::memory().await.unwrap();

        db.create_account("alice", "tok123").await.unwrap();
        let err = db.create_account("alice", "other").await.unwrap_err();
        assert!(matches!(err, AccountStoreError::UsernameTaken));

        // Original credentials untouched, no partial settings row.
        assert!(db
            .verify_credentials("alice", "tok123")
            .await
            .unwrap()
            .is_some());
        assert!(db
            .verify_credentials("alice", "other")
            .await
            .unwrap()
            .is_none());
        assert_eq!(db.count_accounts().await.unwrap(), 1);
        assert_eq!(db.count_settings().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_rolls_back_account_when_settings_insert_fails() {
        let db = Database::memory().await.unwrap();

        // Break the second insert; the account insert must not survive it.
        sqlx::query("DROP TABLE settings")
            .execute(&*db)
            .await
            .unwrap();

        let err = db.create_account("alice", "tok123").await.unwrap_err();
        assert!(matches!(err, AccountStoreError::Database(_)));
        assert_eq!(db.count_accounts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_verify_credentials_is_uniform_on_failure() {
        let db = Database::memory().await.unwrap();
        db.create_account("alice", "tok123").await.unwrap();

        // Wrong token and unknown username look identical.
        let wrong_token = db.verify_credentials("alice", "wrong").await.unwrap();
        let unknown_user = db.verify_credentials("nobody", "tok123").await.unwrap();
        assert_eq!(wrong_token, None);
        assert_eq!(unknown_user, None);

        assert_eq!(
            db.verify_credentials("alice", "tok123").await.unwrap(),
            Some(600)
        );
    }

    #[tokio::test]
    async fn test_vault_lifecycle() {
        let db = Database::memory().await.unwrap();
        db.create_account("alice", "tok123").await.unwrap();

        // Account exists but has no blob yet.
        assert_eq!(db.vault("alice").await.unwrap(), Some(None));

        assert!(db.put_vault("alice", "{\"e\":1}").await.unwrap());
        assert_eq!(
            db.vault("alice").await.unwrap(),
            Some(Some("{\"e\":1}".to_string()))
        );

        // Unknown account: no write, no read.
        assert!(!db.put_vault("nobody", "data").await.unwrap());
        assert_eq!(db.vault("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_vault_isolation_between_accounts() {
        let db = Database::memory().await.unwrap();
        db.create_account("alice", "tok_a").await.unwrap();
        db.create_account("bob_user", "tok_b").await.unwrap();

        db.put_vault("alice", "blobA").await.unwrap();

        assert_eq!(db.vault("bob_user").await.unwrap(), Some(None));
        assert_eq!(
            db.vault("alice").await.unwrap(),
            Some(Some("blobA".to_string()))
        );
    }

    #[tokio::test]
    async fn test_delete_account_cascades_settings() {
        let db = Database::memory().await.unwrap();
        db.create_account("alice", "tok123").await.unwrap();
        db.put_vault("alice", "blob").await.unwrap();

        assert!(db.delete_account("alice").await.unwrap());
        assert!(!db.delete_account("alice").await.unwrap());

        assert_eq!(db.vault("alice").await.unwrap(), None);
        assert_eq!(db.count_accounts().await.unwrap(), 0);
        assert_eq!(db.count_settings().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_settings() {
        let db = Database::memory().await.unwrap();
        db.create_account("alice", "tok123").await.unwrap();

        let updated = SettingsRecord {
            auto_lock_time_interval: 120,
            auto_lock_on_site_refresh: false,
        };
        assert!(db.put_settings("alice", &updated).await.unwrap());
        assert_eq!(db.settings("alice").await.unwrap().unwrap(), updated);

        // Login now reflects the new interval.
        assert_eq!(
            db.verify_credentials("alice", "tok123").await.unwrap(),
            Some(120)
        );

        assert!(!db.put_settings("nobody", &updated).await.unwrap());
        assert_eq!(db.settings("nobody").await.unwrap(), None);
    }
}
