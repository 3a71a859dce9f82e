use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{self, ModelError};
use crate::{booking, user};

pub const PRIORITIES: &[&str] = &["low", "medium", "high"];
pub const STATUSES: &[&str] = &["open", "under_review", "resolved", "closed"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dispute")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    pub raised_by: Uuid,
    pub reason: String,
    pub priority: String,
    pub status: String,
    pub resolution: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Booking, Raiser }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Booking => Entity::belongs_to(booking::Entity).from(Column::BookingId).to(booking::Column::Id).into(),
            Relation::Raiser => Entity::belongs_to(user::Entity).from(Column::RaisedBy).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    booking_id: Uuid,
    raised_by: Uuid,
    reason: &str,
    priority: &str,
) -> Result<Model, ModelError> {
    if reason.trim().is_empty() {
        return Err(ModelError::Validation("reason required".into()));
    }
    errors::validate_member("priority", priority, PRIORITIES)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        raised_by: Set(raised_by),
        reason: Set(reason.to_string()),
        priority: Set(priority.to_string()),
        status: Set("open".into()),
        resolution: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn set_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: &str,
    resolution: Option<String>,
) -> Result<Model, ModelError> {
    errors::validate_member("status", status, STATUSES)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("dispute not found".into()))?
        .into();
    am.status = Set(status.to_string());
    if resolution.is_some() {
        am.resolution = Set(resolution);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
