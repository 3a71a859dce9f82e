//! Bearer-token auth for the protected API surface.
//!
//! Tokens are issued by the service-layer `AuthService`; this module only
//! verifies them and stashes the caller in request extensions. Role checks
//! stay in handlers.

use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::rate_limit::RateLimiter;
use service::auth::domain::Claims;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub limiter: RateLimiter,
}

/// Authenticated caller, injected by [`require_bearer`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("admin only".into()))
        }
    }
}

pub fn decode_bearer(token: &str, secret: &str) -> Result<CurrentUser, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| ApiError::Unauthorized(format!("invalid token: {}", e)))?;
    let id = Uuid::parse_str(&data.claims.uid).map_err(|_| ApiError::Unauthorized("invalid token subject".into()))?;
    Ok(CurrentUser { id, email: data.claims.sub, role: data.claims.role })
}

pub fn bearer_from_headers(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Middleware on the protected routes. OPTIONS passes through so CORS
/// preflight never needs a token.
pub async fn require_bearer(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let token = bearer_from_headers(req.headers()).ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    let user = decode_bearer(token, &state.auth.jwt_secret)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(secret: &str, role: &str) -> String {
        let claims = Claims {
            sub: "t@example.com".into(),
            uid: Uuid::new_v4().to_string(),
            role: role.into(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn decode_roundtrip() {
        let tok = token_for("s3cret", "admin");
        let user = decode_bearer(&tok, "s3cret").unwrap();
        assert_eq!(user.email, "t@example.com");
        assert!(user.require_admin().is_ok());
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let tok = token_for("s3cret", "customer");
        assert!(decode_bearer(&tok, "other").is_err());
    }

    #[test]
    fn non_admin_is_forbidden() {
        let tok = token_for("s3cret", "customer");
        let user = decode_bearer(&tok, "s3cret").unwrap();
        assert!(user.require_admin().is_err());
    }
}
