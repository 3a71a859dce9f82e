use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance_cents: i64,
    pub pending_cents: i64,
    pub currency: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Create an empty wallet for a freshly registered user.
pub async fn create(db: &DatabaseConnection, user_id: Uuid, currency: &str) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        balance_cents: Set(0),
        pending_cents: Set(0),
        currency: Set(currency.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Apply deltas to the wallet balances. Negative results are rejected.
pub async fn adjust(
    db: &DatabaseConnection,
    id: Uuid,
    balance_delta: i64,
    pending_delta: i64,
) -> Result<Model, ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("wallet not found".into()))?;
    let new_balance = found.balance_cents + balance_delta;
    let new_pending = found.pending_cents + pending_delta;
    if new_balance < 0 || new_pending < 0 {
        return Err(ModelError::Validation("wallet balance cannot go negative".into()));
    }
    let mut am: ActiveModel = found.into();
    am.balance_cents = Set(new_balance);
    am.pending_cents = Set(new_pending);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
