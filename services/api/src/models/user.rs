//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// User login credentials
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}

/// Response for register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

impl TokenResponse {
    /// Bearer token response for `user`
    pub fn bearer(access_token: String, user: &User) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user: UserResponse::from(user),
        }
    }
}
