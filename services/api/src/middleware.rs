//! Authentication middleware for JWT token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{error, warn};

use crate::{error::ApiError, state::AppState};

/// Authentication middleware
///
/// Resolves the bearer token to a stored user and inserts that
/// [`User`](crate::models::user::User) into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jwt_service = state.jwt_service().inspect_err(|_| {
        error!("Authenticated route called but SECRET_KEY is not configured");
    })?;

    let TypedHeader(Authorization(bearer)) = bearer
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let user_id = jwt_service.validate_token(bearer.token()).map_err(|e| {
        warn!("Failed to validate token: {}", e);
        ApiError::Unauthorized("Could not validate credentials".to_string())
    })?;

    let user = state
        .user_repository
        .get_by_id(user_id)
        .await
        .map_err(|e| match e {
            ApiError::NotFound(_) => {
                warn!("Token subject {} no longer exists", user_id);
                ApiError::Unauthorized("User not found".to_string())
            }
            e => e,
        })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
