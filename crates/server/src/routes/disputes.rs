use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use common::types::ApiResponse;
use service::dispute_service;

#[derive(Deserialize)]
pub struct OpenDisputeInput {
    pub reason: String,
}

pub async fn open(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(booking_id): Path<Uuid>,
    Json(input): Json<OpenDisputeInput>,
) -> Result<Json<ApiResponse<models::dispute::Model>>, ApiError> {
    let d = dispute_service::open_dispute(&state.db, user.id, booking_id, &input.reason).await?;
    Ok(Json(ApiResponse::ok("dispute opened", d)))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Admins see every dispute; other callers only the ones they raised.
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<models::dispute::Model>>>, ApiError> {
    let p = crate::routes::PageQuery { page: q.page, per_page: q.per_page }.into_pagination();
    let (items, total) = if user.is_admin() {
        dispute_service::list_disputes(&state.db, q.status.as_deref(), p).await?
    } else {
        dispute_service::list_for_user(&state.db, user.id, p).await?
    };
    Ok(Json(ApiResponse::ok_paged("disputes", items, p.meta(total))))
}

pub async fn review(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::dispute::Model>>, ApiError> {
    user.require_admin()?;
    let d = dispute_service::review(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("dispute under review", d)))
}

#[derive(Deserialize)]
pub struct ResolveInput {
    /// Either `refund_customer` or `release_vendor`.
    pub outcome: String,
    #[serde(default)]
    pub resolution: String,
}

pub async fn resolve(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<ResolveInput>,
) -> Result<Json<ApiResponse<models::dispute::Model>>, ApiError> {
    user.require_admin()?;
    let d = dispute_service::resolve(&state.db, id, &input.outcome, &input.resolution).await?;
    Ok(Json(ApiResponse::ok("dispute resolved", d)))
}

pub async fn close(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::dispute::Model>>, ApiError> {
    user.require_admin()?;
    let d = dispute_service::close(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("dispute closed", d)))
}
