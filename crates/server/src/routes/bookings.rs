use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::booking_service;

#[derive(Deserialize)]
pub struct CreateBookingInput {
    pub service_id: Uuid,
    pub scheduled_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub notes: String,
    /// Opening bid; defaults to the listing price.
    pub amount_cents: Option<i64>,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct BookingWithOffer {
    pub booking: models::booking::Model,
    pub offer: models::offer::Model,
}

#[utoipa::path(post, path = "/api/v1/bookings", tag = "bookings",
    responses((status = 200, description = "Booking created with its initial offer"),
              (status = 400, description = "Listing not bookable"),
              (status = 404, description = "Unknown listing")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<CreateBookingInput>,
) -> Result<Json<ApiResponse<BookingWithOffer>>, ApiError> {
    let (booking, offer) = booking_service::create_booking(
        &state.db,
        user.id,
        input.service_id,
        input.scheduled_at,
        &input.notes,
        input.amount_cents,
        &input.message,
    )
    .await?;
    Ok(Json(ApiResponse::ok("booking requested", BookingWithOffer { booking, offer })))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<models::booking::Model>>>, ApiError> {
    let p = PageQuery { page: q.page, per_page: q.per_page }.into_pagination();
    let (items, total) = booking_service::list_for_user(&state.db, user.id, q.status.as_deref(), p).await?;
    Ok(Json(ApiResponse::ok_paged("bookings", items, p.meta(total))))
}

pub async fn get(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::booking::Model>>, ApiError> {
    let b = booking_service::get_booking(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("booking not found".into()))?;
    let (customer, vendor_user) = booking_service::party_user_ids(&state.db, &b).await?;
    if user.id != customer && user.id != vendor_user && !user.is_admin() {
        return Err(ApiError::Forbidden("not a party to this booking".into()));
    }
    Ok(Json(ApiResponse::ok("booking", b)))
}

#[derive(Deserialize)]
pub struct CounterOfferInput {
    pub amount_cents: i64,
    #[serde(default)]
    pub message: String,
}

pub async fn counter_offer(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<CounterOfferInput>,
) -> Result<Json<ApiResponse<models::offer::Model>>, ApiError> {
    let o = booking_service::counter_offer(&state.db, user.id, id, input.amount_cents, &input.message).await?;
    Ok(Json(ApiResponse::ok("counter-offer sent", o)))
}

#[derive(Serialize)]
pub struct AcceptOutput {
    pub booking: models::booking::Model,
    pub payment: models::payment::Model,
}

pub async fn accept_offer(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AcceptOutput>>, ApiError> {
    let (booking, payment) = booking_service::accept_offer(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok("offer accepted, payment due", AcceptOutput { booking, payment })))
}

pub async fn reject_offer(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::booking::Model>>, ApiError> {
    let b = booking_service::reject_offer(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok("offer rejected", b)))
}

pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::booking::Model>>, ApiError> {
    let b = booking_service::cancel(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok("booking cancelled", b)))
}

pub async fn complete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::booking::Model>>, ApiError> {
    let b = booking_service::complete(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok("booking completed", b)))
}
