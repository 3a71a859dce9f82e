use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::payment_service;

pub async fn capture(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::payment::Model>>, ApiError> {
    let p = payment_service::capture(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok("payment captured into escrow", p)))
}

pub async fn get(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::payment::Model>>, ApiError> {
    let p = payment_service::get_payment(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("payment not found".into()))?;
    if p.payer_id != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden("not your payment".into()));
    }
    Ok(Json(ApiResponse::ok("payment", p)))
}

pub async fn my_wallet(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<models::wallet::Model>>, ApiError> {
    let w = payment_service::get_wallet(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok("wallet", w)))
}

#[derive(Deserialize)]
pub struct WithdrawalInput {
    pub amount_cents: i64,
}

pub async fn request_withdrawal(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<WithdrawalInput>,
) -> Result<Json<ApiResponse<models::withdrawal::Model>>, ApiError> {
    let w = payment_service::request_withdrawal(&state.db, user.id, input.amount_cents).await?;
    Ok(Json(ApiResponse::ok("withdrawal requested", w)))
}

pub async fn list_withdrawals(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<models::withdrawal::Model>>>, ApiError> {
    let p = page.into_pagination();
    let (items, total) = payment_service::list_withdrawals(&state.db, user.id, p).await?;
    Ok(Json(ApiResponse::ok_paged("withdrawals", items, p.meta(total))))
}

pub async fn approve_withdrawal(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::withdrawal::Model>>, ApiError> {
    user.require_admin()?;
    let w = payment_service::approve_withdrawal(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("withdrawal paid", w)))
}

pub async fn reject_withdrawal(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::withdrawal::Model>>, ApiError> {
    user.require_admin()?;
    let w = payment_service::reject_withdrawal(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("withdrawal rejected", w)))
}
