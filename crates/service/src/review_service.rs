//! Reviews: one per completed booking, written by the customer.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, pagination::Pagination};
use models::{booking, review, vendor};

/// Create the review and fold the rating into the vendor's running average.
#[instrument(skip(db, comment))]
pub async fn create_review(
    db: &DatabaseConnection,
    reviewer_id: Uuid,
    booking_id: Uuid,
    rating: i32,
    comment: &str,
) -> Result<review::Model, ServiceError> {
    let b = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("booking"))?;
    if b.status != "completed" {
        return Err(ServiceError::Conflict("only completed bookings can be reviewed".into()));
    }
    if b.customer_id != reviewer_id {
        return Err(ServiceError::Forbidden("only the customer may review this booking".into()));
    }
    if review::find_by_booking(db, booking_id).await?.is_some() {
        return Err(ServiceError::Conflict("booking already reviewed".into()));
    }

    let r = review::create(db, booking_id, reviewer_id, b.vendor_id, rating, comment).await?;

    let v = vendor::Entity::find_by_id(b.vendor_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vendor"))?;
    let (avg_bp, count) = vendor::fold_rating(v.rating_avg_bp, v.rating_count, rating);
    vendor::set_rating(db, v.id, avg_bp, count).await?;

    info!(review_id = %r.id, vendor_id = %b.vendor_id, rating, "review_created");
    Ok(r)
}

/// Published reviews for a vendor, newest first.
pub async fn list_for_vendor(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    opts: Pagination,
) -> Result<(Vec<review::Model>, u64), ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = review::Entity::find()
        .filter(review::Column::VendorId.eq(vendor_id))
        .filter(review::Column::DeletedAt.is_null())
        .order_by_desc(review::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

/// Soft delete by the author or an admin. The vendor aggregate is left as-is;
/// the hidden review still counted when it was published.
#[instrument(skip(db))]
pub async fn delete_review(
    db: &DatabaseConnection,
    actor_id: Uuid,
    is_admin: bool,
    review_id: Uuid,
) -> Result<(), ServiceError> {
    let r = review::Entity::find_by_id(review_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .filter(|r| r.deleted_at.is_none())
        .ok_or_else(|| ServiceError::not_found("review"))?;
    if r.reviewer_id != actor_id && !is_admin {
        return Err(ServiceError::Forbidden("not the review author".into()));
    }
    review::soft_delete(db, review_id).await?;
    info!(review_id = %review_id, "review_deleted");
    Ok(())
}
