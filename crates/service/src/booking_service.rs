//! Booking lifecycle and offer negotiation.
//!
//! A booking starts `pending` with an initial offer at the listing price (or
//! the customer's opening bid). The counterparty may counter, which
//! supersedes the previous pending offer, so exactly one offer is actionable
//! at any time. Accepting the pending offer fixes the agreed price, moves the
//! booking to `accepted`, and opens a pending escrow payment. All lifecycle
//! moves are checked against [`transition::allowed`].

use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, notification_service, pagination::Pagination, payment_service, referral_service};
use models::{booking, listing, offer, payment, vendor};

/// Pure transition table for the booking status machine.
pub mod transition {
    /// Legal `from -> to` moves; everything else is a conflict. The two
    /// `disputed` exits are walked by dispute resolution only, so `cancel`
    /// and `complete` add their own status guard on top of this table.
    const TABLE: &[(&str, &str)] = &[
        ("pending", "accepted"),
        ("pending", "rejected"),
        ("pending", "cancelled"),
        ("accepted", "cancelled"),
        ("accepted", "completed"),
        ("accepted", "disputed"),
        ("completed", "disputed"),
        ("disputed", "completed"),
        ("disputed", "cancelled"),
    ];

    pub fn allowed(from: &str, to: &str) -> bool {
        TABLE.contains(&(from, to))
    }

    /// States with no outgoing edges.
    pub fn is_terminal(status: &str) -> bool {
        !TABLE.iter().any(|(f, _)| *f == status)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn pending_can_be_accepted_or_rejected() {
            assert!(allowed("pending", "accepted"));
            assert!(allowed("pending", "rejected"));
            assert!(allowed("pending", "cancelled"));
        }

        #[test]
        fn completed_only_moves_to_disputed() {
            assert!(allowed("completed", "disputed"));
            assert!(!allowed("completed", "cancelled"));
            assert!(!allowed("completed", "accepted"));
        }

        #[test]
        fn no_resurrection_from_terminal_states() {
            assert!(is_terminal("rejected"));
            assert!(is_terminal("cancelled"));
            assert!(!is_terminal("pending"));
            assert!(!is_terminal("accepted"));
            assert!(!is_terminal("disputed"));
        }

        #[test]
        fn accept_requires_pending() {
            assert!(!allowed("accepted", "accepted"));
            assert!(!allowed("rejected", "accepted"));
        }
    }
}

/// Both user ids behind a booking: (customer, vendor's user account).
pub async fn party_user_ids(db: &DatabaseConnection, b: &booking::Model) -> Result<(Uuid, Uuid), ServiceError> {
    let v = vendor::Entity::find_by_id(b.vendor_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vendor"))?;
    Ok((b.customer_id, v.user_id))
}

async fn get_checked(db: &DatabaseConnection, booking_id: Uuid) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("booking"))
}

fn require_transition(b: &booking::Model, to: &str) -> Result<(), ServiceError> {
    if transition::allowed(&b.status, to) {
        Ok(())
    } else {
        Err(ServiceError::bad_transition("booking", &b.status, to))
    }
}

/// Create a booking with its initial offer. `amount_cents` defaults to the
/// listing price when the customer does not open with a bid.
#[instrument(skip(db, notes, message))]
pub async fn create_booking(
    db: &DatabaseConnection,
    customer_id: Uuid,
    listing_id: Uuid,
    scheduled_at: DateTime<FixedOffset>,
    notes: &str,
    amount_cents: Option<i64>,
    message: &str,
) -> Result<(booking::Model, offer::Model), ServiceError> {
    let l = listing::Entity::find_by_id(listing_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .filter(|l| l.deleted_at.is_none())
        .ok_or_else(|| ServiceError::not_found("listing"))?;
    if l.status != "active" {
        return Err(ServiceError::Validation("listing is not bookable".into()));
    }
    let owner = vendor::Entity::find_by_id(l.vendor_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vendor"))?;
    if owner.user_id == customer_id {
        return Err(ServiceError::Validation("cannot book your own listing".into()));
    }

    let b = booking::create(db, listing_id, customer_id, l.vendor_id, scheduled_at, notes).await?;
    let amount = amount_cents.unwrap_or(l.price_cents);
    let o = offer::create(db, b.id, customer_id, amount, message, "initial").await?;

    notification_service::notify_quietly(
        db,
        owner.user_id,
        "booking.created",
        "New booking request",
        &format!("A customer requested '{}' for {}", l.title, b.scheduled_at),
    )
    .await;
    info!(booking_id = %b.id, offer_id = %o.id, amount_cents = amount, "booking_created");
    Ok((b, o))
}

pub async fn get_booking(db: &DatabaseConnection, id: Uuid) -> Result<Option<booking::Model>, ServiceError> {
    booking::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Bookings where the user participates on either side, newest first.
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    status: Option<&str>,
    opts: Pagination,
) -> Result<(Vec<booking::Model>, u64), ServiceError> {
    let mut query = match vendor::find_by_user(db, user_id).await? {
        Some(v) => booking::Entity::find().filter(
            sea_orm::Condition::any()
                .add(booking::Column::CustomerId.eq(user_id))
                .add(booking::Column::VendorId.eq(v.id)),
        ),
        None => booking::Entity::find().filter(booking::Column::CustomerId.eq(user_id)),
    };
    if let Some(status) = status {
        models::errors::validate_member("status", status, booking::STATUSES)?;
        query = query.filter(booking::Column::Status.eq(status));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.order_by_desc(booking::Column::CreatedAt).paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

/// The actionable offer plus the caller's standing relative to it.
async fn actionable_offer(
    db: &DatabaseConnection,
    b: &booking::Model,
    actor_id: Uuid,
) -> Result<offer::Model, ServiceError> {
    let (customer, vendor_user) = party_user_ids(db, b).await?;
    if actor_id != customer && actor_id != vendor_user {
        return Err(ServiceError::Forbidden("not a party to this booking".into()));
    }
    let latest = offer::latest_pending(db, b.id)
        .await?
        .ok_or_else(|| ServiceError::Conflict("no pending offer on this booking".into()))?;
    if latest.proposed_by == actor_id {
        return Err(ServiceError::Forbidden("cannot respond to your own offer".into()));
    }
    Ok(latest)
}

/// Counter the current pending offer; the old one becomes `superseded`.
#[instrument(skip(db, message))]
pub async fn counter_offer(
    db: &DatabaseConnection,
    actor_id: Uuid,
    booking_id: Uuid,
    amount_cents: i64,
    message: &str,
) -> Result<offer::Model, ServiceError> {
    let b = get_checked(db, booking_id).await?;
    if b.status != "pending" {
        return Err(ServiceError::Conflict(format!("booking is '{}', negotiation is closed", b.status)));
    }
    let latest = actionable_offer(db, &b, actor_id).await?;
    offer::set_status(db, latest.id, "superseded").await?;
    let counter = offer::create(db, booking_id, actor_id, amount_cents, message, "counter").await?;

    notification_service::notify_quietly(
        db,
        latest.proposed_by,
        "offer.countered",
        "Counter-offer received",
        &format!("New proposed price: {} cents", amount_cents),
    )
    .await;
    info!(booking_id = %booking_id, offer_id = %counter.id, "offer_countered");
    Ok(counter)
}

/// Accept the pending offer: fixes the price, opens escrow.
#[instrument(skip(db))]
pub async fn accept_offer(
    db: &DatabaseConnection,
    actor_id: Uuid,
    booking_id: Uuid,
) -> Result<(booking::Model, payment::Model), ServiceError> {
    let b = get_checked(db, booking_id).await?;
    require_transition(&b, "accepted")?;
    let latest = actionable_offer(db, &b, actor_id).await?;

    offer::set_status(db, latest.id, "accepted").await?;
    let updated = booking::set_agreed_price(db, booking_id, latest.amount_cents).await?;

    let l = listing::Entity::find_by_id(b.listing_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("listing"))?;
    let p = payment::create(db, booking_id, b.customer_id, latest.amount_cents, &l.currency).await?;

    let (customer, vendor_user) = party_user_ids(db, &updated).await?;
    let other = if actor_id == customer { vendor_user } else { customer };
    notification_service::notify_quietly(
        db,
        other,
        "offer.accepted",
        "Offer accepted",
        &format!("Agreed price: {} cents; payment is now due", latest.amount_cents),
    )
    .await;
    info!(booking_id = %booking_id, payment_id = %p.id, "offer_accepted");
    Ok((updated, p))
}

/// Reject the pending offer; the whole booking is rejected.
#[instrument(skip(db))]
pub async fn reject_offer(db: &DatabaseConnection, actor_id: Uuid, booking_id: Uuid) -> Result<booking::Model, ServiceError> {
    let b = get_checked(db, booking_id).await?;
    require_transition(&b, "rejected")?;
    let latest = actionable_offer(db, &b, actor_id).await?;

    offer::set_status(db, latest.id, "rejected").await?;
    let updated = booking::set_status(db, booking_id, "rejected").await?;

    notification_service::notify_quietly(
        db,
        latest.proposed_by,
        "offer.rejected",
        "Offer rejected",
        "The booking request was declined",
    )
    .await;
    info!(booking_id = %booking_id, "offer_rejected");
    Ok(updated)
}

/// Cancel before work happens. After acceptance only the customer may cancel,
/// and only while the payment has not been captured into escrow.
#[instrument(skip(db))]
pub async fn cancel(db: &DatabaseConnection, actor_id: Uuid, booking_id: Uuid) -> Result<booking::Model, ServiceError> {
    let b = get_checked(db, booking_id).await?;
    // A disputed booking only leaves that state through dispute resolution,
    // never through a party calling cancel.
    if !matches!(b.status.as_str(), "pending" | "accepted") {
        return Err(ServiceError::bad_transition("booking", &b.status, "cancelled"));
    }
    let (customer, vendor_user) = party_user_ids(db, &b).await?;
    if actor_id != customer && actor_id != vendor_user {
        return Err(ServiceError::Forbidden("not a party to this booking".into()));
    }

    if b.status == "accepted" {
        if actor_id != customer {
            return Err(ServiceError::Forbidden("only the customer may cancel an accepted booking".into()));
        }
        if let Some(p) = payment::find_by_booking(db, booking_id).await? {
            match p.status.as_str() {
                "pending" => {
                    payment::set_status(db, p.id, "failed").await?;
                }
                "held" => {
                    // Funds already in escrow flow back through the refund path.
                    payment_service::refund(db, &p).await?;
                }
                other => {
                    return Err(ServiceError::Conflict(format!("payment is '{}', cannot cancel", other)));
                }
            }
        }
    } else if let Some(o) = offer::latest_pending(db, booking_id).await? {
        offer::set_status(db, o.id, "superseded").await?;
    }

    let updated = booking::set_status(db, booking_id, "cancelled").await?;
    let other = if actor_id == customer { vendor_user } else { customer };
    notification_service::notify_quietly(db, other, "booking.cancelled", "Booking cancelled", "").await;
    info!(booking_id = %booking_id, "booking_cancelled");
    Ok(updated)
}

/// Vendor marks the work done: releases escrow and triggers the referral
/// reward check for the customer's first completed booking.
#[instrument(skip(db))]
pub async fn complete(db: &DatabaseConnection, actor_id: Uuid, booking_id: Uuid) -> Result<booking::Model, ServiceError> {
    let b = get_checked(db, booking_id).await?;
    // Only accepted work completes here; a disputed booking completes solely
    // when resolution rules in the vendor's favour.
    if b.status != "accepted" {
        return Err(ServiceError::bad_transition("booking", &b.status, "completed"));
    }
    let (_customer, vendor_user) = party_user_ids(db, &b).await?;
    if actor_id != vendor_user {
        return Err(ServiceError::Forbidden("only the vendor may complete a booking".into()));
    }

    let p = payment::find_by_booking(db, booking_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("payment"))?;
    if p.status != "held" {
        return Err(ServiceError::Payment(format!("payment is '{}', funds must be in escrow first", p.status)));
    }

    payment_service::release(db, &p).await?;
    let updated = booking::set_status(db, booking_id, "completed").await?;
    referral_service::reward_on_first_completion(db, b.customer_id).await?;

    notification_service::notify_quietly(
        db,
        b.customer_id,
        "booking.completed",
        "Booking completed",
        "Funds were released to the vendor; you can now leave a review",
    )
    .await;
    info!(booking_id = %booking_id, "booking_completed");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog_service, payment_service, review_service, test_support::get_db, vendor_service};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn negotiation_and_escrow_chain() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let tag = Uuid::new_v4().simple().to_string();

        let customer = models::user::create(&db, &format!("cust_{tag}@example.com"), "Chain Customer", "customer").await?;
        models::wallet::create(&db, customer.id, "USD").await?;
        let vendor_user = models::user::create(&db, &format!("vend_{tag}@example.com"), "Chain Vendor", "vendor").await?;
        models::wallet::create(&db, vendor_user.id, "USD").await?;
        let v = vendor_service::apply(&db, vendor_user.id, "Chain Test Vendor", "").await?;
        vendor_service::verify(&db, v.id).await?;
        let cat = catalog_service::create_category(&db, "Cleaning", &format!("cleaning-{tag}"), None).await?;
        let l = catalog_service::create_listing(&db, vendor_user.id, cat.id, "Deep clean", "whole flat", 200_00, "USD", 120).await?;

        let when = (Utc::now() + Duration::days(3)).into();
        let (b, initial) = create_booking(&db, customer.id, l.id, when, "", None, "").await?;
        assert_eq!(initial.amount_cents, 200_00);
        assert_eq!(b.status, "pending");

        // Vendor counters; the customer cannot respond to their own offer,
        // but can accept the counter.
        let counter = counter_offer(&db, vendor_user.id, b.id, 250_00, "peak rate").await?;
        assert_eq!(counter.kind, "counter");
        assert!(accept_offer(&db, vendor_user.id, b.id).await.is_err());
        let (accepted, pay) = accept_offer(&db, customer.id, b.id).await?;
        assert_eq!(accepted.agreed_price_cents, Some(250_00));
        assert_eq!(pay.status, "pending");

        // Completion demands funds in escrow.
        let err = complete(&db, vendor_user.id, b.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Payment(_)));

        payment_service::capture(&db, customer.id, pay.id).await?;
        let held = payment_service::get_wallet(&db, vendor_user.id).await?;
        assert_eq!(held.pending_cents, 250_00);

        let done = complete(&db, vendor_user.id, b.id).await?;
        assert_eq!(done.status, "completed");
        let settled = payment_service::get_wallet(&db, vendor_user.id).await?;
        assert_eq!((settled.balance_cents, settled.pending_cents), (250_00, 0));

        let r = review_service::create_review(&db, customer.id, b.id, 5, "spotless").await?;
        assert_eq!(r.rating, 5);
        assert!(review_service::create_review(&db, customer.id, b.id, 4, "again").await.is_err());
        Ok(())
    }
}
