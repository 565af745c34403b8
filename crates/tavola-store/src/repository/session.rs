//! # Session Repository
//!
//! Persists the bearer token between runs. Only the raw token is stored;
//! user details are decoded from it again on restore.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;

/// Repository for the single stored session.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Returns the stored token, if any.
    pub async fn load_token(&self) -> StoreResult<Option<String>> {
        let token: Option<String> = sqlx::query_scalar("SELECT token FROM session WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(token)
    }

    /// Stores `token`, replacing any previous one.
    pub async fn save_token(&self, token: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session (id, token, saved_at) VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET token = excluded.token, saved_at = excluded.saved_at
            "#,
        )
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!("Session token saved");
        Ok(())
    }

    pub async fn clear_token(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM session").execute(&self.pool).await?;
        debug!("Session token cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, StoreConfig};

    #[tokio::test]
    async fn test_token_roundtrip_and_replace() {
        let repo = Database::new(StoreConfig::in_memory()).await.unwrap().session();

        assert_eq!(repo.load_token().await.unwrap(), None);

        repo.save_token("first").await.unwrap();
        repo.save_token("second").await.unwrap();
        assert_eq!(repo.load_token().await.unwrap().as_deref(), Some("second"));

        repo.clear_token().await.unwrap();
        assert_eq!(repo.load_token().await.unwrap(), None);
    }
}
