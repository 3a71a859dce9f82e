use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{category, vendor};

pub const STATUSES: &[&str] = &["active", "paused"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub duration_minutes: i32,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Vendor, Category }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Vendor => Entity::belongs_to(vendor::Entity).from(Column::VendorId).to(vendor::Column::Id).into(),
            Relation::Category => Entity::belongs_to(category::Entity).from(Column::CategoryId).to(category::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_title(title: &str) -> Result<(), ModelError> {
    if title.trim().is_empty() || title.len() > 160 {
        return Err(ModelError::Validation("title required (<=160 chars)".into()));
    }
    Ok(())
}

pub fn validate_price(price_cents: i64) -> Result<(), ModelError> {
    if price_cents <= 0 {
        return Err(ModelError::Validation("price_cents must be positive".into()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    category_id: Uuid,
    title: &str,
    description: &str,
    price_cents: i64,
    currency: &str,
    duration_minutes: i32,
) -> Result<Model, ModelError> {
    validate_title(title)?;
    validate_price(price_cents)?;
    if duration_minutes <= 0 {
        return Err(ModelError::Validation("duration_minutes must be positive".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        vendor_id: Set(vendor_id),
        category_id: Set(category_id),
        title: Set(title.to_string()),
        description: Set(description.to_string()),
        price_cents: Set(price_cents),
        currency: Set(currency.to_string()),
        duration_minutes: Set(duration_minutes),
        status: Set("active".into()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn soft_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("listing not found".into()))?
        .into();
    found.deleted_at = Set(Some(Utc::now().into()));
    found.update(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}
