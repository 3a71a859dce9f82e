//! Referral rewards.
//!
//! The pending referral row is written at registration (see the auth
//! service); this module pays it out on the referred user's first completed
//! booking.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, notification_service, pagination::Pagination};
use models::{referral, wallet};

/// Flat reward credited to the referrer, in cents.
pub const REWARD_CENTS: i64 = 500;

/// Pay the referrer once the referred user completes their first booking.
/// No-op when the user was not referred or the reward was already paid.
#[instrument(skip(db))]
pub async fn reward_on_first_completion(db: &DatabaseConnection, referred_id: Uuid) -> Result<(), ServiceError> {
    let Some(r) = referral::find_by_referred(db, referred_id).await? else {
        return Ok(());
    };
    if r.status != "pending" {
        return Ok(());
    }

    let w = wallet::find_by_user(db, r.referrer_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("wallet"))?;
    wallet::adjust(db, w.id, REWARD_CENTS, 0).await?;
    referral::mark_rewarded(db, r.id, REWARD_CENTS).await?;

    notification_service::notify_quietly(
        db,
        r.referrer_id,
        "referral.rewarded",
        "Referral reward",
        &format!("{} cents were credited to your wallet", REWARD_CENTS),
    )
    .await;
    info!(referral_id = %r.id, referrer_id = %r.referrer_id, "referral_rewarded");
    Ok(())
}

/// Referrals where the user is the referrer, newest first.
pub async fn list_for_referrer(
    db: &DatabaseConnection,
    referrer_id: Uuid,
    opts: Pagination,
) -> Result<(Vec<referral::Model>, u64), ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let paginator = referral::Entity::find()
        .filter(referral::Column::ReferrerId.eq(referrer_id))
        .order_by_desc(referral::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}
