//! Repositories for database operations

use chrono::Utc;
use common::error::DatabaseError;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::user::{NewUser, User},
    password::{hash_password, verify_password},
    validation::normalize_email,
};

pub mod history;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new user, hashing the password before it is stored
    ///
    /// The email domain is stored lowercased. Fails with
    /// [`ApiError::Conflict`] when the email or username is taken.
    pub async fn register(&self, new_user: &NewUser) -> ApiResult<User> {
        info!("Registering new user: {}", new_user.username);
        let email = normalize_email(&new_user.email);

        if self.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email in use: {}", email);
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        if self.find_by_username(&new_user.username).await?.is_some() {
            warn!("Registration rejected, username in use: {}", new_user.username);
            return Err(ApiError::Conflict("Username already taken".to_string()));
        }

        let hashed_password = hash_password(&new_user.password).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

        let user = self
            .insert(&email, &new_user.username, &hashed_password)
            .await?;

        info!("New user created: {} (id {})", user.email, user.id);
        Ok(user)
    }

    /// Insert a user row; a unique constraint violation becomes a conflict
    async fn insert(&self, email: &str, username: &str, hashed_password: &str) -> ApiResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, hashed_password, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, hashed_password, created_at
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(hashed_password)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let e = DatabaseError::Query(e);
            if e.is_unique_violation() {
                // lost a race with a concurrent registration
                warn!("Registration rejected by unique constraint: {}", email);
                ApiError::Conflict("Email or username already registered".to_string())
            } else {
                ApiError::Database(e)
            }
        })
    }

    /// Authenticate a user by email and password
    ///
    /// Returns `None` for an unknown email or a wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            info!("Login failed, unknown email: {}", email);
            return Ok(None);
        };

        if !verify_password(password, &user.hashed_password) {
            info!("Login failed, wrong password for: {}", email);
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Get a user by ID, failing with [`ApiError::NotFound`] when absent
    pub async fn get_by_id(&self, id: i64) -> ApiResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, hashed_password, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email, ignoring the case of its domain
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, hashed_password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, hashed_password, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Fresh in-memory database with the schema applied
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use common::database::{DatabaseConfig, init_pool, run_migrations};

    let pool = init_pool(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to create test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password: "pw123456".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hashed_password() {
        let repo = UserRepository::new(test_pool().await);

        let user = repo.register(&new_user("a@b.com", "a")).await.unwrap();

        assert!(user.id > 0);
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.username, "a");
        assert_ne!(user.hashed_password, "pw123456");
        assert!(verify_password("pw123456", &user.hashed_password));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let repo = UserRepository::new(test_pool().await);
        repo.register(&new_user("a@b.com", "a")).await.unwrap();

        let result = repo.register(&new_user("a@b.com", "someone_else")).await;

        match result {
            Err(ApiError::Conflict(msg)) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected conflict, got {:?}", other.map(|u| u.id)),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let repo = UserRepository::new(test_pool().await);
        repo.register(&new_user("a@b.com", "a")).await.unwrap();

        let result = repo.register(&new_user("other@b.com", "a")).await;

        match result {
            Err(ApiError::Conflict(msg)) => assert_eq!(msg, "Username already taken"),
            other => panic!("expected conflict, got {:?}", other.map(|u| u.id)),
        }
    }

    #[tokio::test]
    async fn test_insert_maps_unique_violation_to_conflict() {
        let repo = UserRepository::new(test_pool().await);
        repo.insert("a@b.com", "a", "hash").await.unwrap();

        for (email, username) in [("a@b.com", "someone_else"), ("other@b.com", "a")] {
            match repo.insert(email, username, "hash").await {
                Err(ApiError::Conflict(msg)) => {
                    assert_eq!(msg, "Email or username already registered")
                }
                other => panic!("expected conflict, got {:?}", other.map(|u| u.id)),
            }
        }
    }

    #[tokio::test]
    async fn test_email_domain_is_case_insensitive() {
        let repo = UserRepository::new(test_pool().await);
        let registered = repo.register(&new_user("a@B.COM", "a")).await.unwrap();
        assert_eq!(registered.email, "a@b.com");

        match repo.register(&new_user("a@b.com", "someone_else")).await {
            Err(ApiError::Conflict(msg)) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected conflict, got {:?}", other.map(|u| u.id)),
        }

        let user = repo.authenticate("a@b.Com", "pw123456").await.unwrap();
        assert_eq!(user.map(|u| u.id), Some(registered.id));

        // the local part stays case-sensitive
        assert!(repo.find_by_email("A@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let repo = UserRepository::new(test_pool().await);
        let registered = repo.register(&new_user("a@b.com", "a")).await.unwrap();

        let user = repo.authenticate("a@b.com", "pw123456").await.unwrap();
        assert_eq!(user.map(|u| u.id), Some(registered.id));

        assert!(repo.authenticate("a@b.com", "wrong-password").await.unwrap().is_none());
        assert!(repo.authenticate("nobody@b.com", "pw123456").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = UserRepository::new(test_pool().await);
        let registered = repo.register(&new_user("a@b.com", "a")).await.unwrap();

        let user = repo.get_by_id(registered.id).await.unwrap();
        assert_eq!(user.email, "a@b.com");

        assert!(matches!(
            repo.get_by_id(registered.id + 1).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
