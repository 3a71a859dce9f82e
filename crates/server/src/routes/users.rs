use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::user_service;

pub async fn get_me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<models::user::Model>>, ApiError> {
    let u = user_service::get_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(ApiResponse::ok("profile", u)))
}

#[derive(Deserialize)]
pub struct UpdateMeInput {
    pub name: String,
}

pub async fn update_me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<UpdateMeInput>,
) -> Result<Json<ApiResponse<models::user::Model>>, ApiError> {
    let u = user_service::update_name(&state.db, user.id, &input.name).await?;
    Ok(Json(ApiResponse::ok("profile updated", u)))
}

pub async fn delete_me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    user_service::soft_delete_user(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok_empty("account deleted")))
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<models::user::Model>>>, ApiError> {
    user.require_admin()?;
    let p = page.into_pagination();
    let (users, total) = user_service::list_users(&state.db, p).await?;
    Ok(Json(ApiResponse::ok_paged("users", users, p.meta(total))))
}
