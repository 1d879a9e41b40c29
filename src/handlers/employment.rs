use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde_json::Value;

use crate::auth::{authorize, authorize_owner, Capability};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{
    CreateEmploymentRequest, EmploymentRecord, ListQuery, PageMeta, UpdateEmploymentRequest,
};
use crate::repository::{EMPLOYMENT_SORT_KEYS, EMPLOYMENT_TRASH_SORT_KEYS};
use crate::state::AppState;

/// GET /api/employment
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<EmploymentRecord>> {
    authorize(Capability::UserOrAdmin, Some(&auth))?;

    let params = query.into_params(EMPLOYMENT_SORT_KEYS, &state.config.query);
    let total = state.employment.count_active(&params.search).await?;
    let rows = state.employment.list_active(&params).await?;
    let meta = PageMeta::new(&params, total);

    Ok(ApiResponse::paginated(
        "Employment records retrieved successfully",
        rows,
        meta,
    ))
}

/// GET /api/employment/trash
///
/// An empty page of trash is reported as 404 rather than an empty list.
pub async fn list_trash(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<EmploymentRecord>> {
    authorize(Capability::AdminOnly, Some(&auth))?;

    let params = query.into_params(EMPLOYMENT_TRASH_SORT_KEYS, &state.config.query);
    let total = state.employment.count_trashed(&params.search).await?;
    let rows = state.employment.list_trashed(&params).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No deleted employment records found"));
    }
    let meta = PageMeta::new(&params, total);

    Ok(ApiResponse::paginated(
        "Deleted employment records retrieved successfully",
        rows,
        meta,
    ))
}

/// GET /api/employment/alumni/:alumni_id
///
/// Complete history for one alumni, trashed records included.
pub async fn by_alumni(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(alumni_id): Path<i64>,
) -> ApiResult<Vec<EmploymentRecord>> {
    authorize(Capability::AdminOnly, Some(&auth))?;

    if state.alumni.find_by_id(alumni_id).await?.is_none() {
        return Err(ApiError::not_found("Alumni not found"));
    }
    let rows = state.employment.list_by_alumni(alumni_id).await?;

    Ok(ApiResponse::ok(
        "Employment records retrieved successfully",
        rows,
    ))
}

/// GET /api/employment/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<EmploymentRecord> {
    authorize(Capability::UserOrAdmin, Some(&auth))?;

    let record = state
        .employment
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employment record not found"))?;

    Ok(ApiResponse::ok(
        "Employment record retrieved successfully",
        record,
    ))
}

/// POST /api/employment
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateEmploymentRequest>,
) -> ApiResult<EmploymentRecord> {
    authorize(Capability::AdminOnly, Some(&auth))?;
    req.validate()?;

    if state.alumni.find_by_id(req.alumni_id).await?.is_none() {
        return Err(ApiError::not_found("Alumni not found"));
    }
    let record = state.employment.create(&req).await?;

    tracing::info!(
        employment_id = record.id,
        alumni_id = record.alumni_id,
        by = auth.user_id,
        "employment record created"
    );

    Ok(ApiResponse::created(
        "Employment record created successfully",
        record,
    ))
}

/// PUT /api/employment/:id
///
/// Works in any lifecycle state so an admin can correct a record that is
/// sitting in the trash. `alumni_id` is immutable.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEmploymentRequest>,
) -> ApiResult<EmploymentRecord> {
    authorize(Capability::AdminOnly, Some(&auth))?;
    req.validate()?;

    let record = state
        .employment
        .update(id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Employment record not found"))?;

    Ok(ApiResponse::ok(
        "Employment record updated successfully",
        record,
    ))
}

/// DELETE /api/employment/soft-delete/:id
///
/// Owner-or-admin: ownership is re-derived from a fresh read of the record
/// and its alumni link, never from anything the client sent.
pub async fn soft_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    authorize(Capability::OwnerOrAdmin, Some(&auth))?;

    let record = state
        .employment
        .find_active_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employment record not found"))?;

    let owner = record.alumni.as_ref().and_then(|a| a.user_id);
    authorize_owner(&auth, owner)?;

    if !state.employment.soft_delete(id).await? {
        return Err(ApiError::not_found("Employment record not found"));
    }

    tracing::info!(employment_id = id, by = auth.user_id, "employment record trashed");

    Ok(ApiResponse::message_only(
        "Employment record moved to trash",
    ))
}

/// PUT /api/employment/trash/restore/:id
pub async fn restore(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<EmploymentRecord> {
    authorize(Capability::AdminOnly, Some(&auth))?;

    let record = state
        .employment
        .restore(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employment record not found in trash"))?;

    tracing::info!(employment_id = id, by = auth.user_id, "employment record restored");

    Ok(ApiResponse::ok(
        "Employment record restored successfully",
        record,
    ))
}

/// DELETE /api/employment/trash/:id
///
/// Permanent removal, only reachable for records already in the trash.
pub async fn delete_trashed(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    authorize(Capability::AdminOnly, Some(&auth))?;

    if !state.employment.hard_delete_trashed(id).await? {
        return Err(ApiError::not_found("Employment record not found in trash"));
    }

    tracing::info!(employment_id = id, by = auth.user_id, "employment record purged");

    Ok(ApiResponse::message_only(
        "Employment record permanently deleted",
    ))
}

/// DELETE /api/employment/:id
///
/// Unconditional delete that skips the trash stage entirely.
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    authorize(Capability::AdminOnly, Some(&auth))?;

    if !state.employment.delete(id).await? {
        return Err(ApiError::not_found("Employment record not found"));
    }

    tracing::info!(employment_id = id, by = auth.user_id, "employment record deleted");

    Ok(ApiResponse::message_only(
        "Employment record deleted successfully",
    ))
}
