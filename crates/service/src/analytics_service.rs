//! Admin counters over the marketplace data. Everything here is read-only
//! aggregation; the numbers are computed on demand, no rollup tables.

use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{booking, payment, user, vendor};

#[derive(Debug, Serialize)]
pub struct BookingCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct TopVendor {
    pub vendor_id: Uuid,
    pub display_name: String,
    pub released_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub bookings_by_status: Vec<BookingCount>,
    pub gross_released_cents: i64,
    pub new_users_30d: u64,
    pub top_vendors: Vec<TopVendor>,
}

pub async fn overview(db: &DatabaseConnection, top_limit: u64) -> Result<Overview, ServiceError> {
    let mut bookings_by_status = Vec::with_capacity(booking::STATUSES.len());
    for status in booking::STATUSES {
        let count = booking::Entity::find()
            .filter(booking::Column::Status.eq(*status))
            .count(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        bookings_by_status.push(BookingCount { status: (*status).to_string(), count });
    }

    let gross: Option<i64> = payment::Entity::find()
        .select_only()
        .column_as(payment::Column::AmountCents.sum(), "total")
        .filter(payment::Column::Status.eq("released"))
        .into_tuple()
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .flatten();

    let cutoff = Utc::now() - Duration::days(30);
    let new_users_30d = user::Entity::find()
        .filter(user::Column::CreatedAt.gte(cutoff))
        .filter(user::Column::DeletedAt.is_null())
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    Ok(Overview {
        bookings_by_status,
        gross_released_cents: gross.unwrap_or(0),
        new_users_30d,
        top_vendors: top_vendors(db, top_limit).await?,
    })
}

/// Vendors ranked by released escrow volume.
pub async fn top_vendors(db: &DatabaseConnection, limit: u64) -> Result<Vec<TopVendor>, ServiceError> {
    let rows: Vec<(Uuid, Option<i64>)> = payment::Entity::find()
        .select_only()
        .column(booking::Column::VendorId)
        .column_as(payment::Column::AmountCents.sum(), "released_cents")
        .join(JoinType::InnerJoin, payment::Relation::Booking.def())
        .filter(payment::Column::Status.eq("released"))
        .group_by(booking::Column::VendorId)
        .order_by_desc(payment::Column::AmountCents.sum())
        .limit(limit)
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut out = Vec::with_capacity(rows.len());
    for (vendor_id, released) in rows {
        let display_name = vendor::Entity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .map(|v| v.display_name)
            .unwrap_or_default();
        out.push(TopVendor { vendor_id, display_name, released_cents: released.unwrap_or(0) });
    }
    Ok(out)
}
