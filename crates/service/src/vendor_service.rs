use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, pagination::Pagination};
use models::{user, vendor};

/// A customer applies to become a vendor. The profile starts `pending` until
/// an admin verifies it; the user keeps their customer role until then.
#[instrument(skip(db, bio))]
pub async fn apply(
    db: &DatabaseConnection,
    user_id: Uuid,
    display_name: &str,
    bio: &str,
) -> Result<vendor::Model, ServiceError> {
    let account = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    if account.deleted_at.is_some() {
        return Err(ServiceError::not_found("user"));
    }
    if vendor::find_by_user(db, user_id).await?.is_some() {
        return Err(ServiceError::Conflict("vendor profile already exists".into()));
    }
    let created = vendor::create(db, user_id, display_name, bio).await?;
    info!(vendor_id = %created.id, user_id = %user_id, "vendor_applied");
    Ok(created)
}

pub async fn get_vendor(db: &DatabaseConnection, id: Uuid) -> Result<Option<vendor::Model>, ServiceError> {
    vendor::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<vendor::Model>, ServiceError> {
    Ok(vendor::find_by_user(db, user_id).await?)
}

/// Vendor edits their own profile fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    display_name: Option<&str>,
    bio: Option<&str>,
) -> Result<vendor::Model, ServiceError> {
    let existing = vendor::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("vendor"))?;
    let mut am: vendor::ActiveModel = existing.into();
    if let Some(name) = display_name {
        vendor::validate_display_name(name)?;
        am.display_name = Set(name.to_string());
    }
    if let Some(bio) = bio {
        am.bio = Set(bio.to_string());
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Admin verification flips the profile to `verified` and upgrades the user role.
#[instrument(skip(db))]
pub async fn verify(db: &DatabaseConnection, vendor_id: Uuid) -> Result<vendor::Model, ServiceError> {
    let existing = vendor::Entity::find_by_id(vendor_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("vendor"))?;
    if existing.status == "verified" {
        return Err(ServiceError::Conflict("vendor already verified".into()));
    }
    let updated = vendor::set_status(db, vendor_id, "verified").await?;

    let mut am: user::ActiveModel = user::Entity::find_by_id(updated.user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?
        .into();
    am.role = Set("vendor".into());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    info!(vendor_id = %vendor_id, "vendor_verified");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn suspend(db: &DatabaseConnection, vendor_id: Uuid) -> Result<vendor::Model, ServiceError> {
    let updated = vendor::set_status(db, vendor_id, "suspended").await?;
    info!(vendor_id = %vendor_id, "vendor_suspended");
    Ok(updated)
}

/// Public directory of verified vendors.
pub async fn list_verified(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<(Vec<vendor::Model>, u64), ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let query = vendor::Entity::find()
        .filter(vendor::Column::Status.eq("verified"))
        .order_by_desc(vendor::Column::RatingAvgBp);
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let vendors = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((vendors, total))
}
