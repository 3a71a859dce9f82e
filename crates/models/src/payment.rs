use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{self, ModelError};
use crate::{booking, user};

pub const STATUSES: &[&str] = &["pending", "held", "released", "refunded", "failed"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    pub payer_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub provider_ref: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Booking, Payer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Booking => Entity::belongs_to(booking::Entity).from(Column::BookingId).to(booking::Column::Id).into(),
            Relation::Payer => Entity::belongs_to(user::Entity).from(Column::PayerId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    booking_id: Uuid,
    payer_id: Uuid,
    amount_cents: i64,
    currency: &str,
) -> Result<Model, ModelError> {
    if amount_cents <= 0 {
        return Err(ModelError::Validation("amount_cents must be positive".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        payer_id: Set(payer_id),
        amount_cents: Set(amount_cents),
        currency: Set(currency.to_string()),
        status: Set("pending".into()),
        provider_ref: Set(format!("mock-{}", Uuid::new_v4())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_booking(db: &DatabaseConnection, booking_id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::BookingId.eq(booking_id))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn set_status(db: &DatabaseConnection, id: Uuid, status: &str) -> Result<Model, ModelError> {
    errors::validate_member("status", status, STATUSES)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("payment not found".into()))?
        .into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
