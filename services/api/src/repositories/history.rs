//! History repository for database operations

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::history::HistoryEntry,
};

/// History repository for database operations
#[derive(Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Create a new history repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a page of a user's history, newest first, with the user's total entry count
    pub async fn list(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<HistoryEntry>, i64)> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            r#"
            SELECT id, user_id, concept, explanation, created_at
            FROM history_entries
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM history_entries WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((entries, total))
    }

    /// Save a concept explanation for a user
    pub async fn create(
        &self,
        user_id: i64,
        concept: &str,
        explanation: &str,
    ) -> ApiResult<HistoryEntry> {
        let entry = sqlx::query_as::<_, HistoryEntry>(
            r#"
            INSERT INTO history_entries (user_id, concept, explanation, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, concept, explanation, created_at
            "#,
        )
        .bind(user_id)
        .bind(concept)
        .bind(explanation)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "History entry {} saved for user {}: {}",
            entry.id, entry.user_id, entry.concept
        );
        Ok(entry)
    }

    /// Delete one of a user's history entries
    ///
    /// An entry owned by another user is reported exactly like a missing one.
    pub async fn delete(&self, user_id: i64, entry_id: i64) -> ApiResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM history_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(entry_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("History entry not found".to_string()));
        }

        info!("History entry deleted: {} for user {}", entry_id, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::user::NewUser,
        repositories::{UserRepository, test_pool},
    };

    async fn setup() -> (HistoryRepository, i64, i64) {
        let pool = test_pool().await;
        let users = UserRepository::new(pool.clone());

        let alice = users
            .register(&NewUser {
                email: "alice@example.com".to_string(),
                username: "alice".to_string(),
                password: "pw123456".to_string(),
            })
            .await
            .unwrap();
        let bob = users
            .register(&NewUser {
                email: "bob@example.com".to_string(),
                username: "bob".to_string(),
                password: "pw123456".to_string(),
            })
            .await
            .unwrap();

        (HistoryRepository::new(pool), alice.id, bob.id)
    }

    #[tokio::test]
    async fn test_create_returns_stored_entry() {
        let (repo, alice, _) = setup().await;

        let entry = repo
            .create(alice, "Recursion", "A function that calls itself")
            .await
            .unwrap();

        assert_eq!(entry.user_id, alice);
        assert_eq!(entry.concept, "Recursion");
        assert_eq!(entry.explanation, "A function that calls itself");
    }

    #[tokio::test]
    async fn test_create_requires_existing_user() {
        let (repo, _, _) = setup().await;

        assert!(matches!(
            repo.create(9999, "Recursion", "A function that calls itself").await,
            Err(ApiError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_full_total() {
        let (repo, alice, bob) = setup().await;
        for concept in ["Loop", "Variable", "Compiler", "DNS"] {
            repo.create(alice, concept, "explained").await.unwrap();
        }
        repo.create(bob, "HTML", "explained").await.unwrap();

        let (entries, total) = repo.list(alice, 50, 0).await.unwrap();
        let concepts: Vec<&str> = entries.iter().map(|e| e.concept.as_str()).collect();
        assert_eq!(concepts, vec!["DNS", "Compiler", "Variable", "Loop"]);
        assert_eq!(total, 4);
        assert!(entries.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let (page, total) = repo.list(alice, 2, 1).await.unwrap();
        let concepts: Vec<&str> = page.iter().map(|e| e.concept.as_str()).collect();
        assert_eq!(concepts, vec!["Compiler", "Variable"]);
        assert_eq!(total, 4);

        let (past_end, total) = repo.list(alice, 10, 10).await.unwrap();
        assert!(past_end.is_empty());
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn test_list_for_user_without_history() {
        let (repo, _, bob) = setup().await;

        let (entries, total) = repo.list(bob, 50, 0).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_delete_own_entry() {
        let (repo, alice, _) = setup().await;
        let entry = repo.create(alice, "Loop", "explained").await.unwrap();

        repo.delete(alice, entry.id).await.unwrap();

        let (entries, total) = repo.list(alice, 50, 0).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(total, 0);

        assert!(matches!(
            repo.delete(alice, entry.id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_other_users_entry_is_not_found() {
        let (repo, alice, bob) = setup().await;
        let entry = repo.create(alice, "Loop", "explained").await.unwrap();

        assert!(matches!(
            repo.delete(bob, entry.id).await,
            Err(ApiError::NotFound(_))
        ));

        // still there for its owner
        let (_, total) = repo.list(alice, 50, 0).await.unwrap();
        assert_eq!(total, 1);
    }
}
