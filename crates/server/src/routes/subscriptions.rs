use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use common::types::ApiResponse;
use service::subscription_service;

#[derive(Deserialize)]
pub struct SubscribeInput {
    pub plan: String,
}

pub async fn subscribe(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<SubscribeInput>,
) -> Result<Json<ApiResponse<models::subscription::Model>>, ApiError> {
    let s = subscription_service::subscribe(&state.db, user.id, &input.plan).await?;
    Ok(Json(ApiResponse::ok("subscribed", s)))
}

pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Option<models::subscription::Model>>>, ApiError> {
    let s = subscription_service::current(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok("subscription", s)))
}

pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<models::subscription::Model>>, ApiError> {
    let s = subscription_service::cancel(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok("subscription cancelled", s)))
}
