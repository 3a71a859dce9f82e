use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Pagination metadata attached to list responses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// Machine-readable error payload inside a failure envelope.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Uniform response envelope: `{ success, message, data?, error?, meta? }`.
///
/// Every endpoint responds with this shape; `data` and `meta` appear on
/// success, `error` on failure, absent fields are omitted from the JSON.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: message.into(), data: Some(data), error: None, meta: None }
    }

    pub fn ok_paged(message: impl Into<String>, data: T, meta: Meta) -> Self {
        Self { success: true, message: message.into(), data: Some(data), error: None, meta: Some(meta) }
    }

    /// Success without a payload (logout, mark-read, deletes).
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), data: None, error: None, meta: None }
    }

    pub fn err(message: impl Into<String>, code: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(ErrorBody { code: code.into(), details }),
            meta: None,
        }
    }
}
