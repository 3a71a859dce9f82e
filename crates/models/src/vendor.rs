use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{self, ModelError};
use crate::user;

pub const STATUSES: &[&str] = &["pending", "verified", "suspended"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub bio: String,
    /// Review average in basis points: 1..=5 stars map to 100..=500.
    pub rating_avg_bp: i32,
    pub rating_count: i32,
    pub status: String,
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

pub fn validate_display_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() || name.len() > 128 {
        return Err(ModelError::Validation("display_name required (<=128 chars)".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    display_name: &str,
    bio: &str,
) -> Result<Model, ModelError> {
    validate_display_name(display_name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        display_name: Set(display_name.to_string()),
        bio: Set(bio.to_string()),
        rating_avg_bp: Set(0),
        rating_count: Set(0),
        status: Set("pending".into()),
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

pub async fn set_status(db: &DatabaseConnection, id: Uuid, status: &str) -> Result<Model, ModelError> {
    errors::validate_member("status", status, STATUSES)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("vendor not found".into()))?
        .into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn set_rating(db: &DatabaseConnection, id: Uuid, avg_bp: i32, count: i32) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?
        .ok_or_else(|| ModelError::Validation("vendor not found".into()))?
        .into();
    am.rating_avg_bp = Set(avg_bp);
    am.rating_count = Set(count);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Fold one new rating (1..=5) into the running average.
pub fn fold_rating(avg_bp: i32, count: i32, new_rating: i32) -> (i32, i32) {
    let total_bp = avg_bp as i64 * count as i64 + new_rating as i64 * 100;
    let new_count = count + 1;
    ((total_bp / new_count as i64) as i32, new_count)
}

#[cfg(test)]
mod tests {
    use super::fold_rating;

    #[test]
    fn first_rating_sets_average() {
        assert_eq!(fold_rating(0, 0, 4), (400, 1));
    }

    #[test]
    fn average_accumulates() {
        let (avg, count) = fold_rating(400, 1, 5);
        assert_eq!((avg, count), (450, 2));
        let (avg, count) = fold_rating(avg, count, 2);
        // (450*2 + 200) / 3 = 366 (integer division)
        assert_eq!((avg, count), (366, 3));
    }
}
