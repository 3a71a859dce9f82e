use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

pub const STATUSES: &[&str] = &["pending", "rewarded"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "referral")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub code: String,
    pub status: String,
    pub reward_cents: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Referrer, Referred }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Referrer => Entity::belongs_to(user::Entity).from(Column::ReferrerId).to(user::Column::Id).into(),
            Relation::Referred => Entity::belongs_to(user::Entity).from(Column::ReferredId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    referrer_id: Uuid,
    referred_id: Uuid,
    code: &str,
) -> Result<Model, ModelError> {
    if referrer_id == referred_id {
        return Err(ModelError::Validation("self-referral is not allowed".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        referrer_id: Set(referrer_id),
        referred_id: Set(referred_id),
        code: Set(code.to_string()),
        status: Set("pending".into()),
        reward_cents: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_referred(db: &DatabaseConnection, referred_id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::ReferredId.eq(referred_id))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn mark_rewarded(db: &DatabaseConnection, id: Uuid, reward_cents: i64) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("referral not found".into()))?
        .into();
    am.status = Set("rewarded".into());
    am.reward_cents = Set(reward_cents);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
