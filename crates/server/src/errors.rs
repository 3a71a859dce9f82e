use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use common::types::ApiResponse;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// HTTP-facing error. Every variant renders the failure envelope
/// `{ success: false, message, error: { code } }` with a matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Payment(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Payment(_) => "PAYMENT",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL",
            ApiError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, code = self.code(), "request failed");
        }
        let body: ApiResponse<()> = ApiResponse::err(self.to_string(), self.code(), None);
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => ApiError::Validation(m),
            ServiceError::NotFound(m) => ApiError::NotFound(m),
            ServiceError::Conflict(m) => ApiError::Conflict(m),
            ServiceError::Forbidden(m) => ApiError::Forbidden(m),
            ServiceError::Payment(m) => ApiError::Payment(m),
            ServiceError::Db(m) => ApiError::Internal(m),
            ServiceError::Model(m) => match m {
                models::errors::ModelError::Validation(msg) => ApiError::Validation(msg),
                models::errors::ModelError::Db(msg) => ApiError::Internal(msg),
            },
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let msg = e.to_string();
        match e {
            AuthError::Validation(_) => ApiError::Validation(msg),
            AuthError::Conflict => ApiError::Conflict(msg),
            AuthError::NotFound => ApiError::NotFound(msg),
            AuthError::Unauthorized => ApiError::Unauthorized(msg),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation("v".into()), StatusCode::BAD_REQUEST, "VALIDATION"),
            (ServiceError::NotFound("n".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServiceError::Conflict("c".into()), StatusCode::CONFLICT, "CONFLICT"),
            (ServiceError::Forbidden("f".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (ServiceError::Payment("p".into()), StatusCode::PAYMENT_REQUIRED, "PAYMENT"),
            (ServiceError::Db("d".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        ];
        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn auth_unauthorized_is_401() {
        let api: ApiError = AuthError::Unauthorized.into();
        assert_eq!(api.status(), StatusCode::UNAUTHORIZED);
    }
}
