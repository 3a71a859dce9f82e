//! Vendor subscription plans. One live subscription per vendor; subscribing
//! to a different plan replaces the old one, and expiry is applied lazily on
//! read.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{subscription, vendor};

const PERIOD_DAYS: i64 = 30;

async fn vendor_of(db: &DatabaseConnection, user_id: Uuid) -> Result<vendor::Model, ServiceError> {
    vendor::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("vendor profile required".into()))
}

/// The vendor's subscription after the lazy expiry check.
pub async fn current(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<subscription::Model>, ServiceError> {
    let v = vendor_of(db, user_id).await?;
    let Some(s) = subscription::find_current(db, v.id).await? else {
        return Ok(None);
    };
    if s.status == "active" && s.current_period_end < Utc::now() {
        let expired = subscription::set_status(db, s.id, "expired").await?;
        return Ok(Some(expired));
    }
    Ok(Some(s))
}

/// Subscribe or switch plans. A live subscription on the same plan is a
/// conflict; a different plan is superseded immediately.
#[instrument(skip(db))]
pub async fn subscribe(db: &DatabaseConnection, user_id: Uuid, plan: &str) -> Result<subscription::Model, ServiceError> {
    models::errors::validate_member("plan", plan, subscription::PLANS)?;
    let v = vendor_of(db, user_id).await?;

    if let Some(s) = current(db, user_id).await? {
        if s.status == "active" {
            if s.plan == plan {
                return Err(ServiceError::Conflict(format!("already subscribed to '{}'", plan)));
            }
            subscription::set_status(db, s.id, "expired").await?;
        }
    }

    let period_end = (Utc::now() + Duration::days(PERIOD_DAYS)).into();
    let s = subscription::create(db, v.id, plan, period_end).await?;
    info!(subscription_id = %s.id, plan = %plan, "subscribed");
    Ok(s)
}

/// Cancel keeps the plan usable until the period end; `current` reports the
/// `cancelled` status right away.
#[instrument(skip(db))]
pub async fn cancel(db: &DatabaseConnection, user_id: Uuid) -> Result<subscription::Model, ServiceError> {
    let v = vendor_of(db, user_id).await?;
    let s = subscription::find_current(db, v.id)
        .await?
        .filter(|s| s.status == "active")
        .ok_or_else(|| ServiceError::Conflict("no active subscription".into()))?;
    let cancelled = subscription::set_status(db, s.id, "cancelled").await?;
    info!(subscription_id = %s.id, "subscription_cancelled");
    Ok(cancelled)
}
