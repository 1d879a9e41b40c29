use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::Value;

use crate::auth::{authorize, Capability};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Alumni, CreateAlumniRequest, ListQuery, PageMeta, UpdateAlumniRequest};
use crate::repository::ALUMNI_SORT_KEYS;
use crate::state::AppState;

/// GET /api/alumni
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Alumni>> {
    authorize(Capability::UserOrAdmin, Some(&auth))?;

    let params = query.into_params(ALUMNI_SORT_KEYS, &state.config.query);
    let total = state.alumni.count(&params.search).await?;
    let rows = state.alumni.list(&params).await?;
    let meta = PageMeta::new(&params, total);

    Ok(ApiResponse::paginated(
        "Alumni retrieved successfully",
        rows,
        meta,
    ))
}

/// GET /api/alumni/without-jobs
///
/// Alumni with no employment history at all; a record in the trash still
/// counts as history, and soft-deleted alumni stay in the report. An empty
/// report is 404, like the employment trash listing.
pub async fn without_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Alumni>> {
    authorize(Capability::UserOrAdmin, Some(&auth))?;

    let rows = state.alumni.without_employment().await?;
    if rows.is_empty() {
        return Err(ApiError::not_found(
            "No alumni without employment records found",
        ));
    }

    Ok(ApiResponse::ok(
        "Alumni without employment records retrieved successfully",
        rows,
    ))
}

/// GET /api/alumni/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Alumni> {
    authorize(Capability::UserOrAdmin, Some(&auth))?;

    let alumni = state
        .alumni
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;

    Ok(ApiResponse::ok("Alumni retrieved successfully", alumni))
}

/// POST /api/alumni
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateAlumniRequest>,
) -> ApiResult<Alumni> {
    authorize(Capability::AdminOnly, Some(&auth))?;
    req.validate()?;

    let alumni = state.alumni.create(&req).await?;

    tracing::info!(alumni_id = alumni.id, by = auth.user_id, "alumni created");

    Ok(ApiResponse::created("Alumni created successfully", alumni))
}

/// PUT /api/alumni/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAlumniRequest>,
) -> ApiResult<Alumni> {
    authorize(Capability::AdminOnly, Some(&auth))?;
    req.validate()?;

    let alumni = state
        .alumni
        .update(id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;

    Ok(ApiResponse::ok("Alumni updated successfully", alumni))
}

/// DELETE /api/alumni/:id
///
/// Soft delete. The row survives for auditing but disappears from the
/// list/get/update paths, and its employment records stop being visible on
/// the active employment list. The without-jobs report keeps showing it.
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    authorize(Capability::AdminOnly, Some(&auth))?;

    if !state.alumni.soft_delete(id).await? {
        return Err(ApiError::not_found("Alumni not found"));
    }

    tracing::info!(alumni_id = id, by = auth.user_id, "alumni deleted");

    Ok(ApiResponse::message_only("Alumni deleted successfully"))
}
