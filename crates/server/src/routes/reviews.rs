use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::review_service;

#[derive(Deserialize)]
pub struct CreateReviewInput {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(booking_id): Path<Uuid>,
    Json(input): Json<CreateReviewInput>,
) -> Result<Json<ApiResponse<models::review::Model>>, ApiError> {
    let r = review_service::create_review(&state.db, user.id, booking_id, input.rating, &input.comment).await?;
    Ok(Json(ApiResponse::ok("review published", r)))
}

pub async fn list_for_vendor(
    State(state): State<ServerState>,
    Path(vendor_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<models::review::Model>>>, ApiError> {
    let p = page.into_pagination();
    let (items, total) = review_service::list_for_vendor(&state.db, vendor_id, p).await?;
    Ok(Json(ApiResponse::ok_paged("reviews", items, p.meta(total))))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    review_service::delete_review(&state.db, user.id, user.is_admin(), id).await?;
    Ok(Json(ApiResponse::ok_empty("review deleted")))
}
