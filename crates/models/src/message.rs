use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{self, ModelError};
use crate::{conversation, user};

pub const KINDS: &[&str] = &["text", "image", "offer", "system"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub kind: String,
    pub read_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Conversation, Sender }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Conversation => Entity::belongs_to(conversation::Entity).from(Column::ConversationId).to(conversation::Column::Id).into(),
            Relation::Sender => Entity::belongs_to(user::Entity).from(Column::SenderId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    conversation_id: Uuid,
    sender_id: Uuid,
    body: &str,
    kind: &str,
) -> Result<Model, ModelError> {
    if body.trim().is_empty() {
        return Err(ModelError::Validation("message body required".into()));
    }
    errors::validate_member("kind", kind, KINDS)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        conversation_id: Set(conversation_id),
        sender_id: Set(sender_id),
        body: Set(body.to_string()),
        kind: Set(kind.to_string()),
        read_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
