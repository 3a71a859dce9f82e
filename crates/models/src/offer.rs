use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{self, ModelError};
use crate::{booking, user};

pub const KINDS: &[&str] = &["initial", "counter"];
pub const STATUSES: &[&str] = &["pending", "accepted", "rejected", "superseded"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    pub proposed_by: Uuid,
    pub amount_cents: i64,
    pub message: String,
    pub kind: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Booking, Proposer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Booking => Entity::belongs_to(booking::Entity).from(Column::BookingId).to(booking::Column::Id).into(),
            Relation::Proposer => Entity::belongs_to(user::Entity).from(Column::ProposedBy).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    booking_id: Uuid,
    proposed_by: Uuid,
    amount_cents: i64,
    message: &str,
    kind: &str,
) -> Result<Model, ModelError> {
    if amount_cents <= 0 {
        return Err(ModelError::Validation("amount_cents must be positive".into()));
    }
    errors::validate_member("kind", kind, KINDS)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        proposed_by: Set(proposed_by),
        amount_cents: Set(amount_cents),
        message: Set(message.to_string()),
        kind: Set(kind.to_string()),
        status: Set("pending".into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// The single actionable offer on a booking, if any.
pub async fn latest_pending(db: &DatabaseConnection, booking_id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::BookingId.eq(booking_id))
        .filter(Column::Status.eq("pending"))
        .order_by_desc(Column::CreatedAt)
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
        .ok_or_else(|| ModelError::Validation("offer not found".into()))?
        .into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
