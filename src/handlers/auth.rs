use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::{
    authorize, hash_password, issue_token, meets_length_requirement, verify_password, Capability,
    MIN_PASSWORD_LEN,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, Role, User};
use crate::state::AppState;

/// POST /api/auth/login
///
/// The identifier doubles as username or email; an `@` selects the email
/// lookup. Lookup misses and bad passwords produce the same 401 so the
/// response does not reveal which part failed.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    authorize(Capability::Public, None)?;

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let identifier = req.username.trim();
    let found = if identifier.contains('@') {
        state.users.find_by_email(identifier).await?
    } else {
        state.users.find_by_username(identifier).await?
    };

    let (mut user, password_hash) =
        found.ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    if !verify_password(&req.password, &password_hash) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    state.users.touch_last_login(user.id).await?;
    user.last_login_at = Some(Utc::now());

    let token = issue_token(&user, &state.config.auth).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal("Failed to generate access token")
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "user logged in");

    Ok(ApiResponse::ok(
        "Login successful",
        LoginResponse { user, token },
    ))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<User> {
    authorize(Capability::Public, None)?;

    let username = req.username.trim();
    let email = req.email.trim();
    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation(
            "Username, email, and password are required",
        ));
    }
    if !meets_length_requirement(&req.password) {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if state.users.find_by_username(username).await?.is_some() {
        return Err(ApiError::validation("Username is already taken"));
    }
    if state.users.find_by_email(email).await?.is_some() {
        return Err(ApiError::validation("Email is already registered"));
    }

    let role = req.role.unwrap_or(Role::User);
    let password_hash = hash_password(&req.password)?;
    let user = state
        .users
        .create(username, email, role, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, role = %role.as_str(), "user registered");

    Ok(ApiResponse::created("User registered successfully", user))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<ProfileResponse> {
    authorize(Capability::Authenticated, Some(&auth))?;

    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::ok(
        "Profile retrieved successfully",
        ProfileResponse::from(&user),
    ))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the session ends when the client discards its
/// token, so this only confirms the intent.
pub async fn logout(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    authorize(Capability::Authenticated, Some(&auth))?;

    tracing::info!(user_id = auth.user_id, "user logged out");

    Ok(ApiResponse::message_only(
        "Logout successful. Please remove the token on the client",
    ))
}

/// GET /api/auth/validate
pub async fn validate(Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    authorize(Capability::Authenticated, Some(&auth))?;

    Ok(ApiResponse::ok(
        "Token is valid",
        json!({
            "user_id": auth.user_id,
            "username": auth.username,
            "role": auth.role,
        }),
    ))
}
