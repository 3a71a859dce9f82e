//! Categories and service listings. Listings are exposed under `/services`.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::catalog_service::{self, ListingFilter};

// --- categories -----------------------------------------------------------

pub async fn list_categories(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<models::category::Model>>>, ApiError> {
    let cats = catalog_service::list_categories(&state.db).await?;
    Ok(Json(ApiResponse::ok("categories", cats)))
}

#[derive(Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
}

pub async fn create_category(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<Json<ApiResponse<models::category::Model>>, ApiError> {
    user.require_admin()?;
    let c = catalog_service::create_category(&state.db, &input.name, &input.slug, input.parent_id).await?;
    Ok(Json(ApiResponse::ok("category created", c)))
}

#[derive(Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub active: Option<bool>,
}

pub async fn update_category(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<ApiResponse<models::category::Model>>, ApiError> {
    user.require_admin()?;
    let c = catalog_service::update_category(&state.db, id, input.name.as_deref(), input.active).await?;
    Ok(Json(ApiResponse::ok("category updated", c)))
}

pub async fn delete_category(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    user.require_admin()?;
    catalog_service::delete_category(&state.db, id).await?;
    Ok(Json(ApiResponse::ok_empty("category deleted")))
}

// --- listings -------------------------------------------------------------

#[derive(Deserialize)]
pub struct SearchQuery {
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/api/v1/services", tag = "catalog",
    responses((status = 200, description = "Active listings, filterable and paginated")))]
pub async fn search_listings(
    State(state): State<ServerState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<models::listing::Model>>>, ApiError> {
    let filter = ListingFilter {
        category_id: q.category_id,
        vendor_id: q.vendor_id,
        min_price_cents: q.min_price_cents,
        max_price_cents: q.max_price_cents,
    };
    let p = PageQuery { page: q.page, per_page: q.per_page }.into_pagination();
    let (items, total) = catalog_service::search_listings(&state.db, filter, p).await?;
    Ok(Json(ApiResponse::ok_paged("services", items, p.meta(total))))
}

#[derive(Deserialize)]
pub struct CreateListingInput {
    pub category_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub duration_minutes: i32,
}

fn default_currency() -> String {
    "USD".into()
}

pub async fn create_listing(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<CreateListingInput>,
) -> Result<Json<ApiResponse<models::listing::Model>>, ApiError> {
    let l = catalog_service::create_listing(
        &state.db,
        user.id,
        input.category_id,
        &input.title,
        &input.description,
        input.price_cents,
        &input.currency,
        input.duration_minutes,
    )
    .await?;
    Ok(Json(ApiResponse::ok("service created", l)))
}

pub async fn get_listing(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<models::listing::Model>>, ApiError> {
    let l = catalog_service::get_listing(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("service not found".into()))?;
    Ok(Json(ApiResponse::ok("service", l)))
}

#[derive(Deserialize)]
pub struct UpdateListingInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub status: Option<String>,
}

pub async fn update_listing(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateListingInput>,
) -> Result<Json<ApiResponse<models::listing::Model>>, ApiError> {
    let l = catalog_service::update_listing(
        &state.db,
        user.id,
        id,
        input.title.as_deref(),
        input.description.as_deref(),
        input.price_cents,
        input.status.as_deref(),
    )
    .await?;
    Ok(Json(ApiResponse::ok("service updated", l)))
}

pub async fn delete_listing(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    catalog_service::delete_listing(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok_empty("service deleted")))
}
