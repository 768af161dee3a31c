//! Application state shared across handlers

use sqlx::SqlitePool;

use crate::{
    error::{ApiError, ApiResult},
    explain::ExplanationGateway,
    jwt::JwtService,
    repositories::{UserRepository, history::HistoryRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub user_repository: UserRepository,
    pub history_repository: HistoryRepository,
    /// `None` when `SECRET_KEY` was missing at startup
    pub jwt_service: Option<JwtService>,
    pub explanation_gateway: ExplanationGateway,
}

impl AppState {
    /// Build the state, creating the repositories over `db_pool`
    pub fn new(
        db_pool: SqlitePool,
        jwt_service: Option<JwtService>,
        explanation_gateway: ExplanationGateway,
    ) -> Self {
        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            history_repository: HistoryRepository::new(db_pool.clone()),
            db_pool,
            jwt_service,
            explanation_gateway,
        }
    }

    /// The token service, or a configuration error when no secret is set
    pub fn jwt_service(&self) -> ApiResult<&JwtService> {
        self.jwt_service
            .as_ref()
            .ok_or_else(|| ApiError::Config("SECRET_KEY is not configured".to_string()))
    }
}
