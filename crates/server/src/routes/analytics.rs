use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use common::types::ApiResponse;
use service::analytics_service::{self, Overview};

#[derive(Deserialize)]
pub struct OverviewQuery {
    /// Cap on the top-vendor ranking.
    pub top: Option<u64>,
}

pub async fn overview(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<OverviewQuery>,
) -> Result<Json<ApiResponse<Overview>>, ApiError> {
    user.require_admin()?;
    let top = q.top.unwrap_or(5).min(50);
    let data = analytics_service::overview(&state.db, top).await?;
    Ok(Json(ApiResponse::ok("overview", data)))
}
