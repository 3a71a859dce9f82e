use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{self, ModelError};
use crate::{listing, user, vendor};

pub const STATUSES: &[&str] = &["pending", "accepted", "rejected", "cancelled", "completed", "disputed"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub listing_id: Uuid,
    pub customer_id: Uuid,
    pub vendor_id: Uuid,
    pub scheduled_at: DateTimeWithTimeZone,
    pub agreed_price_cents: Option<i64>,
    pub status: String,
    pub notes: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Listing, Customer, Vendor }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Listing => Entity::belongs_to(listing::Entity).from(Column::ListingId).to(listing::Column::Id).into(),
            Relation::Customer => Entity::belongs_to(user::Entity).from(Column::CustomerId).to(user::Column::Id).into(),
            Relation::Vendor => Entity::belongs_to(vendor::Entity).from(Column::VendorId).to(vendor::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    listing_id: Uuid,
    customer_id: Uuid,
    vendor_id: Uuid,
    scheduled_at: DateTimeWithTimeZone,
    notes: &str,
) -> Result<Model, ModelError> {
    if scheduled_at < Utc::now() {
        return Err(ModelError::Validation("scheduled_at must be in the future".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        listing_id: Set(listing_id),
        customer_id: Set(customer_id),
        vendor_id: Set(vendor_id),
        scheduled_at: Set(scheduled_at),
        agreed_price_cents: Set(None),
        status: Set("pending".into()),
        notes: Set(notes.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn set_status(db: &DatabaseConnection, id: Uuid, status: &str) -> Result<Model, ModelError> {
    errors::validate_member("status", status, STATUSES)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("booking not found".into()))?
        .into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Record the negotiated price when an offer is accepted.
pub async fn set_agreed_price(db: &DatabaseConnection, id: Uuid, price_cents: i64) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("booking not found".into()))?
        .into();
    am.agreed_price_cents = Set(Some(price_cents));
    am.status = Set("accepted".into());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
