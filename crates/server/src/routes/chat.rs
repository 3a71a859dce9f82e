use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;
use crate::routes::PageQuery;
use common::types::ApiResponse;
use service::chat_service;

#[derive(Deserialize)]
pub struct OpenConversationInput {
    pub user_id: Uuid,
    pub booking_id: Option<Uuid>,
}

pub async fn open(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<OpenConversationInput>,
) -> Result<Json<ApiResponse<models::conversation::Model>>, ApiError> {
    let c = chat_service::open_conversation(&state.db, user.id, input.user_id, input.booking_id).await?;
    Ok(Json(ApiResponse::ok("conversation", c)))
}

#[derive(Serialize)]
pub struct ConversationsOutput {
    pub conversations: Vec<models::conversation::Model>,
    pub unread: u64,
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<ConversationsOutput>>, ApiError> {
    let p = page.into_pagination();
    let (conversations, total) = chat_service::list_conversations(&state.db, user.id, p).await?;
    let unread = chat_service::unread_count(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok_paged(
        "conversations",
        ConversationsOutput { conversations, unread },
        p.meta(total),
    )))
}

#[derive(Deserialize)]
pub struct SendMessageInput {
    pub body: String,
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "text".into()
}

pub async fn send_message(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<SendMessageInput>,
) -> Result<Json<ApiResponse<models::message::Model>>, ApiError> {
    let m = chat_service::send_message(&state.db, user.id, id, &input.body, &input.kind).await?;
    Ok(Json(ApiResponse::ok("message sent", m)))
}

pub async fn list_messages(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<models::message::Model>>>, ApiError> {
    let p = page.into_pagination();
    let (items, total) = chat_service::list_messages(&state.db, user.id, id, p).await?;
    Ok(Json(ApiResponse::ok_paged("messages", items, p.meta(total))))
}

#[derive(Serialize)]
pub struct MarkReadOutput {
    pub marked: u64,
}

pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MarkReadOutput>>, ApiError> {
    let marked = chat_service::mark_read(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok("conversation read", MarkReadOutput { marked })))
}
