use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::notification_service;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<models::notification::Model>>>, ApiError> {
    let p = PageQuery { page: q.page, per_page: q.per_page }.into_pagination();
    let (items, total) = notification_service::list_for_user(&state.db, user.id, q.unread_only, p).await?;
    Ok(Json(ApiResponse::ok_paged("notifications", items, p.meta(total))))
}

pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::notification::Model>>, ApiError> {
    let n = notification_service::mark_read(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok("notification read", n)))
}

#[derive(Serialize)]
pub struct ReadAllOutput {
    pub marked: u64,
}

pub async fn mark_all_read(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ReadAllOutput>>, ApiError> {
    let marked = notification_service::mark_all_read(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok("all notifications read", ReadAllOutput { marked })))
}
