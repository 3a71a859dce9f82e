use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::{referral_service, user_service};

#[derive(Serialize)]
pub struct MyReferralsOutput {
    pub referral_code: String,
    pub referrals: Vec<models::referral::Model>,
}

pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<MyReferralsOutput>>, ApiError> {
    let u = user_service::get_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    let p = page.into_pagination();
    let (referrals, total) = referral_service::list_for_referrer(&state.db, user.id, p).await?;
    Ok(Json(ApiResponse::ok_paged(
        "referrals",
        MyReferralsOutput { referral_code: u.referral_code, referrals },
        p.meta(total),
    )))
}
