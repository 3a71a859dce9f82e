//! Escrow payments, wallets and withdrawals.
//!
//! Money moves in three steps: `capture` pulls the agreed amount from the
//! customer (mock provider) and parks it as the vendor's `pending_cents`;
//! `release` moves pending funds into the spendable balance; `refund` returns
//! escrowed funds to the customer's wallet. Withdrawals debit the spendable
//! balance only when an admin approves them.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, notification_service, pagination::Pagination};
use models::{booking, payment, vendor, wallet, withdrawal};

async fn vendor_wallet(db: &DatabaseConnection, vendor_id: Uuid) -> Result<wallet::Model, ServiceError> {
    let v = vendor::Entity::find_by_id(vendor_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vendor"))?;
    wallet::find_by_user(db, v.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("wallet"))
}

async fn booking_of(db: &DatabaseConnection, p: &payment::Model) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(p.booking_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("booking"))
}

pub async fn get_payment(db: &DatabaseConnection, id: Uuid) -> Result<Option<payment::Model>, ServiceError> {
    payment::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Customer pays: the mock provider always succeeds, the amount is held in
/// escrow as the vendor's pending funds.
#[instrument(skip(db))]
pub async fn capture(db: &DatabaseConnection, actor_id: Uuid, payment_id: Uuid) -> Result<payment::Model, ServiceError> {
    let p = get_payment(db, payment_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("payment"))?;
    if p.payer_id != actor_id {
        return Err(ServiceError::Forbidden("only the payer may capture this payment".into()));
    }
    if p.status != "pending" {
        return Err(ServiceError::bad_transition("payment", &p.status, "held"));
    }

    let b = booking_of(db, &p).await?;
    let w = vendor_wallet(db, b.vendor_id).await?;
    wallet::adjust(db, w.id, 0, p.amount_cents).await?;
    let held = payment::set_status(db, p.id, "held").await?;

    let v = vendor::Entity::find_by_id(b.vendor_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vendor"))?;
    notification_service::notify_quietly(
        db,
        v.user_id,
        "payment.held",
        "Payment received",
        &format!("{} cents are held in escrow for booking {}", p.amount_cents, b.id),
    )
    .await;
    info!(payment_id = %payment_id, amount_cents = p.amount_cents, "payment_captured");
    Ok(held)
}

/// Escrow release: pending -> spendable on the vendor's wallet. Called from
/// booking completion and dispute resolution, never exposed raw.
pub async fn release(db: &DatabaseConnection, p: &payment::Model) -> Result<payment::Model, ServiceError> {
    if p.status != "held" {
        return Err(ServiceError::bad_transition("payment", &p.status, "released"));
    }
    let b = booking_of(db, p).await?;
    let w = vendor_wallet(db, b.vendor_id).await?;
    wallet::adjust(db, w.id, p.amount_cents, -p.amount_cents).await?;
    let released = payment::set_status(db, p.id, "released").await?;
    info!(payment_id = %p.id, amount_cents = p.amount_cents, "payment_released");
    Ok(released)
}

/// Escrow refund: the vendor's pending funds go back to the customer's wallet.
pub async fn refund(db: &DatabaseConnection, p: &payment::Model) -> Result<payment::Model, ServiceError> {
    if p.status != "held" {
        return Err(ServiceError::bad_transition("payment", &p.status, "refunded"));
    }
    let b = booking_of(db, p).await?;
    let vw = vendor_wallet(db, b.vendor_id).await?;
    wallet::adjust(db, vw.id, 0, -p.amount_cents).await?;
    let cw = wallet::find_by_user(db, p.payer_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("wallet"))?;
    wallet::adjust(db, cw.id, p.amount_cents, 0).await?;
    let refunded = payment::set_status(db, p.id, "refunded").await?;

    notification_service::notify_quietly(
        db,
        p.payer_id,
        "payment.refunded",
        "Payment refunded",
        &format!("{} cents were returned to your wallet", p.amount_cents),
    )
    .await;
    info!(payment_id = %p.id, amount_cents = p.amount_cents, "payment_refunded");
    Ok(refunded)
}

pub async fn get_wallet(db: &DatabaseConnection, user_id: Uuid) -> Result<wallet::Model, ServiceError> {
    wallet::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("wallet"))
}

/// Request a payout of spendable funds. The balance is only debited when an
/// admin approves, but the request is rejected up front if it exceeds it.
#[instrument(skip(db))]
pub async fn request_withdrawal(
    db: &DatabaseConnection,
    user_id: Uuid,
    amount_cents: i64,
) -> Result<withdrawal::Model, ServiceError> {
    if amount_cents <= 0 {
        return Err(ServiceError::Validation("amount_cents must be positive".into()));
    }
    let w = get_wallet(db, user_id).await?;
    if amount_cents > w.balance_cents {
        return Err(ServiceError::Payment(format!(
            "requested {} cents but only {} are available",
            amount_cents, w.balance_cents
        )));
    }
    let req = withdrawal::create(db, w.id, amount_cents).await?;
    info!(withdrawal_id = %req.id, amount_cents, "withdrawal_requested");
    Ok(req)
}

pub async fn list_withdrawals(
    db: &DatabaseConnection,
    user_id: Uuid,
    opts: Pagination,
) -> Result<(Vec<withdrawal::Model>, u64), ServiceError> {
    let w = get_wallet(db, user_id).await?;
    let (page_idx, per_page) = opts.normalize();
    let paginator = withdrawal::Entity::find()
        .filter(withdrawal::Column::WalletId.eq(w.id))
        .order_by_desc(withdrawal::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}

/// Admin approval debits the wallet and marks the request paid out.
#[instrument(skip(db))]
pub async fn approve_withdrawal(db: &DatabaseConnection, withdrawal_id: Uuid) -> Result<withdrawal::Model, ServiceError> {
    let req = withdrawal::Entity::find_by_id(withdrawal_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("withdrawal"))?;
    if req.status != "requested" {
        return Err(ServiceError::bad_transition("withdrawal", &req.status, "approved"));
    }
    let w = wallet::Entity::find_by_id(req.wallet_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("wallet"))?;
    if req.amount_cents > w.balance_cents {
        return Err(ServiceError::Payment("insufficient funds at approval time".into()));
    }
    wallet::adjust(db, w.id, -req.amount_cents, 0).await?;
    withdrawal::set_status(db, req.id, "approved").await?;
    // The mock payout rail settles immediately.
    let paid = withdrawal::set_status(db, req.id, "paid").await?;

    notification_service::notify_quietly(
        db,
        w.user_id,
        "withdrawal.paid",
        "Withdrawal paid out",
        &format!("{} cents were paid out", req.amount_cents),
    )
    .await;
    info!(withdrawal_id = %withdrawal_id, "withdrawal_paid");
    Ok(paid)
}

#[instrument(skip(db))]
pub async fn reject_withdrawal(db: &DatabaseConnection, withdrawal_id: Uuid) -> Result<withdrawal::Model, ServiceError> {
    let req = withdrawal::Entity::find_by_id(withdrawal_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("withdrawal"))?;
    if req.status != "requested" {
        return Err(ServiceError::bad_transition("withdrawal", &req.status, "rejected"));
    }
    let rejected = withdrawal::set_status(db, req.id, "rejected").await?;
    let w = wallet::Entity::find_by_id(req.wallet_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if let Some(w) = w {
        notification_service::notify_quietly(db, w.user_id, "withdrawal.rejected", "Withdrawal rejected", "").await;
    }
    Ok(rejected)
}
