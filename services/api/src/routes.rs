//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    explain::{ExplainError, Explanation, ExplanationGateway},
    middleware::auth_middleware,
    models::{
        MessageResponse,
        history::{HistoryEntryResponse, HistoryListResponse, HistoryQuery, SaveHistoryRequest},
        user::{LoginCredentials, NewUser, TokenResponse, User, UserResponse},
    },
    state::AppState,
    validation,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/me", get(current_user))
        .route("/api/history", get(list_history).post(save_history))
        .route("/api/history/:id", delete(delete_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/explain", get(explain))
        .route("/api/fallback-explain", get(fallback_explain))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint, reporting database connectivity
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match common::database::health_check(&state.db_pool).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            error!("Health check could not reach the database: {}", e);
            format!("disconnected: {}", e)
        }
    };

    Json(json!({
        "status": "healthy",
        "database": database,
        "message": "ELI5 Server is running successfully!"
    }))
}

/// Register a new user and log them in
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<NewUser>, ApiError>,
) -> ApiResult<Json<TokenResponse>> {
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_username(&payload.username).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    let jwt_service = state.jwt_service()?;
    let user = state.user_repository.register(&payload).await?;

    let token = jwt_service.issue_token(user.id).map_err(|e| {
        error!("Failed to issue token for user {}: {}", user.id, e);
        ApiError::InternalServerError
    })?;

    Ok(Json(TokenResponse::bearer(token, &user)))
}

/// Exchange email and password for an access token
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(credentials), _): WithRejection<Json<LoginCredentials>, ApiError>,
) -> ApiResult<Json<TokenResponse>> {
    validation::validate_email(&credentials.email).map_err(ApiError::Validation)?;
    validation::validate_login_password(&credentials.password).map_err(ApiError::Validation)?;

    let jwt_service = state.jwt_service()?;
    let user = state
        .user_repository
        .authenticate(&credentials.email, &credentials.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect email or password".to_string()))?;

    let token = jwt_service.issue_token(user.id).map_err(|e| {
        error!("Failed to issue token for user {}: {}", user.id, e);
        ApiError::InternalServerError
    })?;

    info!("User logged in: {}", user.email);
    Ok(Json(TokenResponse::bearer(token, &user)))
}

/// The authenticated user
pub async fn current_user(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// A page of the authenticated user's history, newest first
pub async fn list_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, ApiError>,
) -> ApiResult<Json<HistoryListResponse>> {
    let (limit, offset) =
        validation::validate_pagination(query.limit, query.offset).map_err(ApiError::Validation)?;

    let (entries, total) = state
        .history_repository
        .list(user.id, limit, offset)
        .await?;

    Ok(Json(HistoryListResponse {
        entries: entries.into_iter().map(HistoryEntryResponse::from).collect(),
        total,
    }))
}

/// Save an explanation to the authenticated user's history
pub async fn save_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    WithRejection(Json(payload), _): WithRejection<Json<SaveHistoryRequest>, ApiError>,
) -> ApiResult<Json<HistoryEntryResponse>> {
    validation::validate_history_entry(&payload.concept, &payload.explanation)
        .map_err(ApiError::Validation)?;

    let entry = state
        .history_repository
        .create(user.id, &payload.concept, &payload.explanation)
        .await?;

    Ok(Json(HistoryEntryResponse::from(entry)))
}

/// Delete one of the authenticated user's history entries
pub async fn delete_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<MessageResponse>> {
    state.history_repository.delete(user.id, id).await?;

    Ok(Json(MessageResponse::ok("History entry deleted successfully")))
}

/// Explain a randomly chosen concept
pub async fn explain(State(state): State<AppState>) -> ApiResult<Json<Explanation>> {
    let explanation = state
        .explanation_gateway
        .explain()
        .await
        .map_err(|e| match e {
            e @ ExplainError::NotConfigured => ApiError::Config(e.to_string()),
            ExplainError::Provider(msg) => ApiError::Provider(msg),
        })?;

    Ok(Json(explanation))
}

/// Canned explanation that works without the provider
pub async fn fallback_explain() -> Json<Explanation> {
    Json(ExplanationGateway::fallback_explain())
}
