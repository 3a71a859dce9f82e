//! In-app notifications. Writing one must never fail the business operation
//! that triggered it, so the internal entry point logs and swallows errors.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{errors::ServiceError, pagination::Pagination};
use models::notification;

/// Fire-and-forget write used from the booking/payment/dispute/chat/referral
/// flows.
pub async fn notify_quietly(db: &DatabaseConnection, user_id: Uuid, kind: &str, title: &str, body: &str) {
    if let Err(e) = notification::create(db, user_id, kind, title, body).await {
        warn!(user_id = %user_id, kind = %kind, error = %e, "notification_write_failed");
    }
}

/// Own notifications, newest first, with the unread count alongside.
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    unread_only: bool,
    opts: Pagination,
) -> Result<(Vec<notification::Model>, u64), ServiceError> {
    let mut query = notification::Entity::find().filter(notification::Column::UserId.eq(user_id));
    if unread_only {
        query = query.filter(notification::Column::ReadAt.is_null());
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.order_by_desc(notification::Column::CreatedAt).paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

#[instrument(skip(db))]
pub async fn mark_read(db: &DatabaseConnection, user_id: Uuid, notification_id: Uuid) -> Result<notification::Model, ServiceError> {
    let n = notification::Entity::find_by_id(notification_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("notification"))?;
    if n.user_id != user_id {
        return Err(ServiceError::Forbidden("not your notification".into()));
    }
    if n.read_at.is_some() {
        return Ok(n);
    }
    notification::mark_read(db, notification_id).await.map_err(Into::into)
}

#[instrument(skip(db))]
pub async fn mark_all_read(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, ServiceError> {
    let res = notification::Entity::update_many()
        .col_expr(notification::Column::ReadAt, Expr::value(Some(Utc::now())))
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::ReadAt.is_null())
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
