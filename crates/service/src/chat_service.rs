//! Conversations and messages between marketplace users.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, notification_service, pagination::Pagination};
use models::{conversation, message, user};

async fn get_involved(
    db: &DatabaseConnection,
    conversation_id: Uuid,
    actor_id: Uuid,
) -> Result<conversation::Model, ServiceError> {
    let c = conversation::Entity::find_by_id(conversation_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("conversation"))?;
    if !c.involves(actor_id) {
        return Err(ServiceError::Forbidden("not a participant".into()));
    }
    Ok(c)
}

/// Open a conversation with another user, reusing the existing thread if one
/// exists between the pair.
#[instrument(skip(db))]
pub async fn open_conversation(
    db: &DatabaseConnection,
    actor_id: Uuid,
    other_user_id: Uuid,
    booking_id: Option<Uuid>,
) -> Result<conversation::Model, ServiceError> {
    let other = user::Entity::find_by_id(other_user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .filter(|u| u.deleted_at.is_none())
        .ok_or_else(|| ServiceError::not_found("user"))?;
    if let Some(existing) = conversation::find_between(db, actor_id, other.id).await? {
        return Ok(existing);
    }
    let c = conversation::create(db, actor_id, other.id, booking_id).await?;
    info!(conversation_id = %c.id, "conversation_opened");
    Ok(c)
}

/// All threads the user participates in, most recently active first.
pub async fn list_conversations(
    db: &DatabaseConnection,
    user_id: Uuid,
    opts: Pagination,
) -> Result<(Vec<conversation::Model>, u64), ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = conversation::Entity::find()
        .filter(
            Condition::any()
                .add(conversation::Column::ParticipantA.eq(user_id))
                .add(conversation::Column::ParticipantB.eq(user_id)),
        )
        .order_by_desc(conversation::Column::LastMessageAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

#[instrument(skip(db, body))]
pub async fn send_message(
    db: &DatabaseConnection,
    actor_id: Uuid,
    conversation_id: Uuid,
    body: &str,
    kind: &str,
) -> Result<message::Model, ServiceError> {
    let c = get_involved(db, conversation_id, actor_id).await?;
    let m = message::create(db, conversation_id, actor_id, body, kind).await?;
    conversation::touch(db, conversation_id).await?;

    let recipient = if c.participant_a == actor_id { c.participant_b } else { c.participant_a };
    notification_service::notify_quietly(db, recipient, "chat.message", "New message", body).await;
    info!(message_id = %m.id, conversation_id = %conversation_id, "message_sent");
    Ok(m)
}

/// Messages oldest-first so the page reads top to bottom.
pub async fn list_messages(
    db: &DatabaseConnection,
    actor_id: Uuid,
    conversation_id: Uuid,
    opts: Pagination,
) -> Result<(Vec<message::Model>, u64), ServiceError> {
    get_involved(db, conversation_id, actor_id).await?;
    let (page_idx, per_page) = opts.normalize();
    let paginator = message::Entity::find()
        .filter(message::Column::ConversationId.eq(conversation_id))
        .order_by_asc(message::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

/// Mark everything the other side sent as read.
#[instrument(skip(db))]
pub async fn mark_read(db: &DatabaseConnection, actor_id: Uuid, conversation_id: Uuid) -> Result<u64, ServiceError> {
    get_involved(db, conversation_id, actor_id).await?;
    let res = message::Entity::update_many()
        .col_expr(message::Column::ReadAt, Expr::value(Some(Utc::now())))
        .filter(message::Column::ConversationId.eq(conversation_id))
        .filter(message::Column::SenderId.ne(actor_id))
        .filter(message::Column::ReadAt.is_null())
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

/// Unread messages addressed to the user across all their threads.
pub async fn unread_count(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ServiceError> {
    let convs: Vec<Uuid> = conversation::Entity::find()
        .filter(
            Condition::any()
                .add(conversation::Column::ParticipantA.eq(user_id))
                .add(conversation::Column::ParticipantB.eq(user_id)),
        )
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|c| c.id)
        .collect();
    if convs.is_empty() {
        return Ok(0);
    }
    message::Entity::find()
        .filter(message::Column::ConversationId.is_in(convs))
        .filter(message::Column::SenderId.ne(user_id))
        .filter(message::Column::ReadAt.is_null())
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}
