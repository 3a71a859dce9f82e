//! Categories and service listings: the browsable side of the marketplace.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{errors::ServiceError, pagination::Pagination};
use models::{category, listing, vendor};

/// Filters accepted by the public listing search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingFilter {
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
}

// --- categories -----------------------------------------------------------

#[instrument(skip(db))]
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
    slug: &str,
    parent_id: Option<Uuid>,
) -> Result<category::Model, ServiceError> {
    if category::find_by_slug(db, slug).await?.is_some() {
        return Err(ServiceError::Conflict(format!("slug '{}' already in use", slug)));
    }
    if let Some(pid) = parent_id {
        category::Entity::find_by_id(pid)
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("parent category"))?;
    }
    let created = category::create(db, name, slug, parent_id).await?;
    info!(category_id = %created.id, slug = %created.slug, "category_created");
    Ok(created)
}

pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<&str>,
    active: Option<bool>,
) -> Result<category::Model, ServiceError> {
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))?
        .into();
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(ServiceError::Validation("name required".into()));
        }
        am.name = Set(name.to_string());
    }
    if let Some(active) = active {
        am.active = Set(active);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let in_use = listing::Entity::find()
        .filter(listing::Column::CategoryId.eq(id))
        .filter(listing::Column::DeletedAt.is_null())
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if in_use > 0 {
        return Err(ServiceError::Conflict("category still has listings".into()));
    }
    category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

/// All active categories; the tree is reassembled client-side via parent_id.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    category::Entity::find()
        .filter(category::Column::Active.eq(true))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

// --- listings -------------------------------------------------------------

/// Create a listing owned by the caller's vendor profile. Only verified
/// vendors may publish.
#[allow(clippy::too_many_arguments)]
#[instrument(skip(db, description))]
pub async fn create_listing(
    db: &DatabaseConnection,
    owner_user_id: Uuid,
    category_id: Uuid,
    title: &str,
    description: &str,
    price_cents: i64,
    currency: &str,
    duration_minutes: i32,
) -> Result<listing::Model, ServiceError> {
    let owner = vendor::find_by_user(db, owner_user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("vendor profile required".into()))?;
    if owner.status != "verified" {
        return Err(ServiceError::Forbidden("vendor is not verified".into()));
    }
    let cat = category::Entity::find_by_id(category_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))?;
    if !cat.active {
        return Err(ServiceError::Validation("category is inactive".into()));
    }
    let created = listing::create(db, owner.id, category_id, title, description, price_cents, currency, duration_minutes).await?;
    info!(listing_id = %created.id, vendor_id = %owner.id, "listing_created");
    Ok(created)
}

pub async fn get_listing(db: &DatabaseConnection, id: Uuid) -> Result<Option<listing::Model>, ServiceError> {
    let found = listing::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found.filter(|l| l.deleted_at.is_none()))
}

/// Vendor-owned update; ownership is checked against the caller.
#[allow(clippy::too_many_arguments)]
pub async fn update_listing(
    db: &DatabaseConnection,
    owner_user_id: Uuid,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    price_cents: Option<i64>,
    status: Option<&str>,
) -> Result<listing::Model, ServiceError> {
    let existing = get_listing(db, id).await?.ok_or_else(|| ServiceError::not_found("listing"))?;
    let owner = vendor::find_by_user(db, owner_user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("vendor profile required".into()))?;
    if existing.vendor_id != owner.id {
        return Err(ServiceError::Forbidden("not your listing".into()));
    }
    let mut am: listing::ActiveModel = existing.into();
    if let Some(title) = title {
        listing::validate_title(title)?;
        am.title = Set(title.to_string());
    }
    if let Some(description) = description {
        am.description = Set(description.to_string());
    }
    if let Some(price) = price_cents {
        listing::validate_price(price)?;
        am.price_cents = Set(price);
    }
    if let Some(status) = status {
        models::errors::validate_member("status", status, listing::STATUSES)?;
        am.status = Set(status.to_string());
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn delete_listing(db: &DatabaseConnection, owner_user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    let existing = get_listing(db, id).await?.ok_or_else(|| ServiceError::not_found("listing"))?;
    let owner = vendor::find_by_user(db, owner_user_id)
        .await?
        .ok_or_else(|| ServiceError::Forbidden("vendor profile required".into()))?;
    if existing.vendor_id != owner.id {
        return Err(ServiceError::Forbidden("not your listing".into()));
    }
    listing::soft_delete(db, id).await?;
    Ok(())
}

/// Public search over active, non-deleted listings.
pub async fn search_listings(
    db: &DatabaseConnection,
    filter: ListingFilter,
    opts: Pagination,
) -> Result<(Vec<listing::Model>, u64), ServiceError> {
    let mut query = listing::Entity::find()
        .filter(listing::Column::DeletedAt.is_null())
        .filter(listing::Column::Status.eq("active"));
    if let Some(cid) = filter.category_id {
        query = query.filter(listing::Column::CategoryId.eq(cid));
    }
    if let Some(vid) = filter.vendor_id {
        query = query.filter(listing::Column::VendorId.eq(vid));
    }
    if let Some(min) = filter.min_price_cents {
        query = query.filter(listing::Column::PriceCents.gte(min));
    }
    if let Some(max) = filter.max_price_cents {
        query = query.filter(listing::Column::PriceCents.lte(max));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.order_by_desc(listing::Column::CreatedAt).paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((items, total))
}
