use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::vendor_service;

#[derive(Deserialize)]
pub struct ApplyInput {
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
}

pub async fn apply(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<ApplyInput>,
) -> Result<Json<ApiResponse<models::vendor::Model>>, ApiError> {
    let v = vendor_service::apply(&state.db, user.id, &input.display_name, &input.bio).await?;
    Ok(Json(ApiResponse::ok("vendor application submitted", v)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<models::vendor::Model>>>, ApiError> {
    let p = page.into_pagination();
    let (vendors, total) = vendor_service::list_verified(&state.db, p).await?;
    Ok(Json(ApiResponse::ok_paged("vendors", vendors, p.meta(total))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::vendor::Model>>, ApiError> {
    let v = vendor_service::get_vendor(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("vendor not found".into()))?;
    Ok(Json(ApiResponse::ok("vendor", v)))
}

/// The caller's own vendor profile, whatever its status.
pub async fn get_me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<models::vendor::Model>>, ApiError> {
    let v = vendor_service::get_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("vendor profile not found".into()))?;
    Ok(Json(ApiResponse::ok("vendor profile", v)))
}

#[derive(Deserialize)]
pub struct UpdateProfileInput {
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

pub async fn update_me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<ApiResponse<models::vendor::Model>>, ApiError> {
    let v = vendor_service::update_profile(&state.db, user.id, input.display_name.as_deref(), input.bio.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok("vendor profile updated", v)))
}

pub async fn verify(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::vendor::Model>>, ApiError> {
    user.require_admin()?;
    let v = vendor_service::verify(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("vendor verified", v)))
}

pub async fn suspend(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::vendor::Model>>, ApiError> {
    user.require_admin()?;
    let v = vendor_service::suspend(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("vendor suspended", v)))
}
