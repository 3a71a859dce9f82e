pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod wallet;
pub mod vendor;
pub mod category;
pub mod listing;
pub mod booking;
pub mod offer;
pub mod payment;
pub mod withdrawal;
pub mod dispute;
pub mod review;
pub mod conversation;
pub mod message;
pub mod notification;
pub mod referral;
pub mod subscription;

#[cfg(test)]
mod crud_tests {
    use chrono::{Duration, Utc};
    use migration::MigratorTrait;
    use uuid::Uuid;

    use crate::{booking, category, db, listing, offer, user, vendor, wallet};

    // End-to-end CRUD pass over the core tables; skipped without a database.
    #[tokio::test]
    async fn test_marketplace_crud_chain() {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return;
        }
        let db = match db::connect().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return;
            }
        };
        if let Err(e) = migration::Migrator::up(&db, None).await {
            eprintln!("skip: migrate up failed: {}", e);
            return;
        }

        let email = format!("crud_{}@example.com", Uuid::new_v4());
        let u = user::create(&db, &email, "Crud Customer", "customer").await.expect("create user");
        let w = wallet::create(&db, u.id, "USD").await.expect("create wallet");
        assert_eq!(w.balance_cents, 0);

        let vu_email = format!("crud_v_{}@example.com", Uuid::new_v4());
        let vu = user::create(&db, &vu_email, "Crud Vendor", "vendor").await.expect("create vendor user");
        let v = vendor::create(&db, vu.id, "Crud & Sons", "we fix things").await.expect("create vendor");
        assert_eq!(v.status, "pending");

        let slug = format!("crud-cat-{}", Uuid::new_v4().simple());
        let c = category::create(&db, "Crud Cat", &slug, None).await.expect("create category");

        let l = listing::create(&db, v.id, c.id, "Fix a tap", "desc", 5000, "USD", 60)
            .await
            .expect("create listing");

        let b = booking::create(&db, l.id, u.id, v.id, (Utc::now() + Duration::days(1)).into(), "morning")
            .await
            .expect("create booking");
        assert_eq!(b.status, "pending");

        let o = offer::create(&db, b.id, u.id, 5000, "list price", "initial").await.expect("create offer");
        let latest = offer::latest_pending(&db, b.id).await.expect("latest").expect("some");
        assert_eq!(latest.id, o.id);

        // Cleanup: user cascade removes wallet; restrict FKs force explicit order.
        use sea_orm::EntityTrait;
        offer::Entity::delete_by_id(o.id).exec(&db).await.expect("del offer");
        booking::Entity::delete_by_id(b.id).exec(&db).await.expect("del booking");
        listing::Entity::delete_by_id(l.id).exec(&db).await.expect("del listing");
        category::Entity::delete_by_id(c.id).exec(&db).await.expect("del category");
        user::hard_delete(&db, vu.id).await.expect("del vendor user");
        user::hard_delete(&db, u.id).await.expect("del user");
    }
}
