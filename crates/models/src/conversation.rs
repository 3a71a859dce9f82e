use chrono::Utc;
use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{booking, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Option<Uuid>,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub last_message_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Booking, ParticipantA, ParticipantB }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Booking => Entity::belongs_to(booking::Entity).from(Column::BookingId).to(booking::Column::Id).into(),
            Relation::ParticipantA => Entity::belongs_to(user::Entity).from(Column::ParticipantA).to(user::Column::Id).into(),
            Relation::ParticipantB => Entity::belongs_to(user::Entity).from(Column::ParticipantB).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }
}

pub async fn create(
    db: &DatabaseConnection,
    participant_a: Uuid,
    participant_b: Uuid,
    booking_id: Option<Uuid>,
) -> Result<Model, ModelError> {
    if participant_a == participant_b {
        return Err(ModelError::Validation("cannot open a conversation with yourself".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        participant_a: Set(participant_a),
        participant_b: Set(participant_b),
        created_at: Set(now),
        last_message_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Existing thread between the pair, in either participant order.
pub async fn find_between(
    db: &DatabaseConnection,
    a: Uuid,
    b: Uuid,
) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(
            Condition::any()
                .add(Condition::all().add(Column::ParticipantA.eq(a)).add(Column::ParticipantB.eq(b)))
                .add(Condition::all().add(Column::ParticipantA.eq(b)).add(Column::ParticipantB.eq(a))),
        )
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn touch(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("conversation not found".into()))?
        .into();
    am.last_message_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}
