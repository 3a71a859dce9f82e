//! Disputes over accepted or completed bookings.
//!
//! Either party may open one; the booking flips to `disputed` and admins walk
//! the dispute through review and resolution. Resolving decides where the
//! escrowed money goes.

use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{booking_service, errors::ServiceError, notification_service, pagination::Pagination, payment_service};
use models::{booking, dispute, payment, vendor};

/// Dispute weight is keyed off the contested amount.
pub fn priority_for_amount(amount_cents: i64) -> &'static str {
    if amount_cents >= 500_00 {
        "high"
    } else if amount_cents >= 100_00 {
        "medium"
    } else {
        "low"
    }
}

pub async fn get_dispute(db: &DatabaseConnection, id: Uuid) -> Result<Option<dispute::Model>, ServiceError> {
    dispute::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Open a dispute; only one live dispute per booking.
#[instrument(skip(db, reason))]
pub async fn open_dispute(
    db: &DatabaseConnection,
    actor_id: Uuid,
    booking_id: Uuid,
    reason: &str,
) -> Result<dispute::Model, ServiceError> {
    let b = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("booking"))?;
    if !matches!(b.status.as_str(), "accepted" | "completed") {
        return Err(ServiceError::bad_transition("booking", &b.status, "disputed"));
    }
    let (customer, vendor_user) = booking_service::party_user_ids(db, &b).await?;
    if actor_id != customer && actor_id != vendor_user {
        return Err(ServiceError::Forbidden("not a party to this booking".into()));
    }
    let existing = dispute::Entity::find()
        .filter(dispute::Column::BookingId.eq(booking_id))
        .filter(dispute::Column::Status.is_in(["open", "under_review"]))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("a dispute is already open for this booking".into()));
    }

    let amount = b.agreed_price_cents.unwrap_or(0);
    let d = dispute::create(db, booking_id, actor_id, reason, priority_for_amount(amount)).await?;
    booking::set_status(db, booking_id, "disputed").await?;

    let other = if actor_id == customer { vendor_user } else { customer };
    notification_service::notify_quietly(db, other, "dispute.opened", "Dispute opened", reason).await;
    info!(dispute_id = %d.id, booking_id = %booking_id, priority = %d.priority, "dispute_opened");
    Ok(d)
}

/// Admin listing, open-first then newest.
pub async fn list_disputes(
    db: &DatabaseConnection,
    status: Option<&str>,
    opts: Pagination,
) -> Result<(Vec<dispute::Model>, u64), ServiceError> {
    let mut query = dispute::Entity::find();
    if let Some(status) = status {
        models::errors::validate_member("status", status, dispute::STATUSES)?;
        query = query.filter(dispute::Column::Status.eq(status));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.order_by_desc(dispute::Column::CreatedAt).paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

/// Disputes on bookings the caller is a party to, whichever side raised them.
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    opts: Pagination,
) -> Result<(Vec<dispute::Model>, u64), ServiceError> {
    let mut party = Condition::any().add(booking::Column::CustomerId.eq(user_id));
    if let Some(v) = vendor::find_by_user(db, user_id).await? {
        party = party.add(booking::Column::VendorId.eq(v.id));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = dispute::Entity::find()
        .join(JoinType::InnerJoin, dispute::Relation::Booking.def())
        .filter(party)
        .order_by_desc(dispute::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

#[instrument(skip(db))]
pub async fn review(db: &DatabaseConnection, dispute_id: Uuid) -> Result<dispute::Model, ServiceError> {
    let d = get_dispute(db, dispute_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("dispute"))?;
    if d.status != "open" {
        return Err(ServiceError::bad_transition("dispute", &d.status, "under_review"));
    }
    let updated = dispute::set_status(db, dispute_id, "under_review", None).await?;
    info!(dispute_id = %dispute_id, "dispute_under_review");
    Ok(updated)
}

/// Admin resolution. The outcome drives the escrow: `refund_customer` sends
/// held funds back, `release_vendor` pays them out; the booking lands in
/// `cancelled` or `completed` accordingly.
#[instrument(skip(db, resolution))]
pub async fn resolve(
    db: &DatabaseConnection,
    dispute_id: Uuid,
    outcome: &str,
    resolution: &str,
) -> Result<dispute::Model, ServiceError> {
    let d = get_dispute(db, dispute_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("dispute"))?;
    if !matches!(d.status.as_str(), "open" | "under_review") {
        return Err(ServiceError::bad_transition("dispute", &d.status, "resolved"));
    }

    let b = booking::Entity::find_by_id(d.booking_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("booking"))?;
    let p = payment::find_by_booking(db, d.booking_id).await?;

    match outcome {
        "refund_customer" => {
            if let Some(p) = p.filter(|p| p.status == "held") {
                payment_service::refund(db, &p).await?;
            }
            booking::set_status(db, b.id, "cancelled").await?;
        }
        "release_vendor" => {
            if let Some(p) = p.filter(|p| p.status == "held") {
                payment_service::release(db, &p).await?;
            }
            booking::set_status(db, b.id, "completed").await?;
        }
        other => {
            return Err(ServiceError::Validation(format!(
                "outcome must be 'refund_customer' or 'release_vendor', got '{}'",
                other
            )));
        }
    }

    let updated = dispute::set_status(db, dispute_id, "resolved", Some(resolution.to_string())).await?;
    let (customer, vendor_user) = booking_service::party_user_ids(db, &b).await?;
    for uid in [customer, vendor_user] {
        notification_service::notify_quietly(db, uid, "dispute.resolved", "Dispute resolved", resolution).await;
    }
    info!(dispute_id = %dispute_id, outcome = %outcome, "dispute_resolved");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn close(db: &DatabaseConnection, dispute_id: Uuid) -> Result<dispute::Model, ServiceError> {
    let d = get_dispute(db, dispute_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("dispute"))?;
    if d.status != "resolved" {
        return Err(ServiceError::bad_transition("dispute", &d.status, "closed"));
    }
    dispute::set_status(db, dispute_id, "closed", None)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog_service, test_support::get_db, vendor_service};
    use chrono::{Duration, Utc};

    #[test]
    fn priority_scales_with_amount() {
        assert_eq!(priority_for_amount(99_99), "low");
        assert_eq!(priority_for_amount(100_00), "medium");
        assert_eq!(priority_for_amount(499_99), "medium");
        assert_eq!(priority_for_amount(500_00), "high");
    }

    #[tokio::test]
    async fn dispute_refund_returns_escrow() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let tag = Uuid::new_v4().simple().to_string();

        let customer = models::user::create(&db, &format!("dcust_{tag}@example.com"), "Dispute Customer", "customer").await?;
        models::wallet::create(&db, customer.id, "USD").await?;
        let vendor_user = models::user::create(&db, &format!("dvend_{tag}@example.com"), "Dispute Vendor", "vendor").await?;
        models::wallet::create(&db, vendor_user.id, "USD").await?;
        let v = vendor_service::apply(&db, vendor_user.id, "Dispute Test Vendor", "").await?;
        vendor_service::verify(&db, v.id).await?;
        let cat = catalog_service::create_category(&db, "Repairs", &format!("repairs-{tag}"), None).await?;
        let l = catalog_service::create_listing(&db, vendor_user.id, cat.id, "Fix boiler", "", 150_00, "USD", 90).await?;

        let when = (Utc::now() + Duration::days(2)).into();
        let (b, _initial) = booking_service::create_booking(&db, customer.id, l.id, when, "", None, "").await?;
        let (_, pay) = booking_service::accept_offer(&db, vendor_user.id, b.id).await?;
        payment_service::capture(&db, customer.id, pay.id).await?;

        let d = open_dispute(&db, customer.id, b.id, "vendor never arrived").await?;
        assert_eq!(d.priority, "medium");
        assert!(open_dispute(&db, vendor_user.id, b.id, "counter claim").await.is_err());

        // Neither party can sidestep an open dispute.
        assert!(booking_service::complete(&db, vendor_user.id, b.id).await.is_err());
        assert!(booking_service::cancel(&db, customer.id, b.id).await.is_err());
        let held = payment_service::get_wallet(&db, vendor_user.id).await?;
        assert_eq!((held.balance_cents, held.pending_cents), (0, 150_00));

        // The vendor did not raise the dispute but is still a party to it.
        let (seen, _) = list_for_user(&db, vendor_user.id, Pagination::default()).await?;
        assert!(seen.iter().any(|x| x.id == d.id));

        assert!(close(&db, d.id).await.is_err());
        review(&db, d.id).await?;
        let err = resolve(&db, d.id, "split_the_difference", "").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let resolved = resolve(&db, d.id, "refund_customer", "no-show confirmed").await?;
        assert_eq!(resolved.status, "resolved");

        let vw = payment_service::get_wallet(&db, vendor_user.id).await?;
        assert_eq!((vw.balance_cents, vw.pending_cents), (0, 0));
        let cw = payment_service::get_wallet(&db, customer.id).await?;
        assert_eq!(cw.balance_cents, 150_00);
        let after = booking_service::get_booking(&db, b.id).await?.expect("booking");
        assert_eq!(after.status, "cancelled");

        let closed = close(&db, d.id).await?;
        assert_eq!(closed.status, "closed");
        Ok(())
    }
}
