use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{extract_bearer, validate_token, Claims};
use crate::error::ApiError;
use crate::models::Role;
use crate::state::AppState;

/// Verified caller identity, extracted from the bearer token and carried
/// through the request as an extension.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects the
/// caller identity into the request extensions.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    // An absent Bearer prefix means "no credential supplied", not "invalid
    // credential"; both end in 401 but with distinct messages.
    let token = extract_bearer(header);
    if token.is_empty() {
        return Err(ApiError::unauthorized("Access token required"));
    }

    let claims = validate_token(token, &state.config.auth).map_err(|e| {
        tracing::warn!("token rejected: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
