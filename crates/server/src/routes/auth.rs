use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use common::types::ApiResponse;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};

fn auth_service(state: &ServerState) -> AuthService<SeaOrmAuthRepository> {
    let repo = Arc::new(SeaOrmAuthRepository { db: state.db.clone() });
    AuthService::new(
        repo,
        AuthConfig {
            jwt_secret: Some(state.auth.jwt_secret.clone()),
            token_ttl_hours: state.auth.token_ttl_hours,
            password_algorithm: "argon2".into(),
        },
    )
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
    pub referral_code: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub token: String,
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses((status = 200, description = "Registered"), (status = 400, description = "Validation"), (status = 409, description = "Email taken")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<ApiResponse<RegisterOutput>>, ApiError> {
    let user = auth_service(&state).register(input).await?;
    Ok(Json(ApiResponse::ok(
        "registered",
        RegisterOutput { user_id: user.id, referral_code: user.referral_code },
    )))
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in"), (status = 401, description = "Bad credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<ApiResponse<LoginOutput>>, ApiError> {
    let session = auth_service(&state).login(input).await?;
    let token = session.token.ok_or_else(|| ApiError::Internal("token generation failed".into()))?;
    let user = session.user;
    Ok(Json(ApiResponse::ok(
        "logged in",
        LoginOutput { user_id: user.id, email: user.email, name: user.name, role: user.role, token },
    )))
}

/// Stateless tokens: logout is client-side, the endpoint only acknowledges.
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::ok_empty("logged out"))
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub referral_code: String,
}

pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<MeOutput>>, ApiError> {
    let u = service::user_service::get_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(ApiResponse::ok(
        "me",
        MeOutput { user_id: u.id, email: u.email, name: u.name, role: u.role, referral_code: u.referral_code },
    )))
}
