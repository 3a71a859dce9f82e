//! Migrator registering entity-specific migrations in FK dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_user;
mod m20240301_000002_create_user_credentials;
mod m20240301_000003_create_wallet;
mod m20240301_000004_create_vendor;
mod m20240301_000005_create_category;
mod m20240301_000006_create_listing;
mod m20240301_000007_create_booking;
mod m20240301_000008_create_offer;
mod m20240301_000009_create_payment;
mod m20240301_000010_create_withdrawal;
mod m20240301_000011_create_dispute;
mod m20240301_000012_create_review;
mod m20240301_000013_create_conversation;
mod m20240301_000014_create_message;
mod m20240301_000015_create_notification;
mod m20240301_000016_create_referral;
mod m20240301_000017_create_subscription;
mod m20240301_000018_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_user::Migration),
            Box::new(m20240301_000002_create_user_credentials::Migration),
            Box::new(m20240301_000003_create_wallet::Migration),
            Box::new(m20240301_000004_create_vendor::Migration),
            Box::new(m20240301_000005_create_category::Migration),
            Box::new(m20240301_000006_create_listing::Migration),
            Box::new(m20240301_000007_create_booking::Migration),
            Box::new(m20240301_000008_create_offer::Migration),
            Box::new(m20240301_000009_create_payment::Migration),
            Box::new(m20240301_000010_create_withdrawal::Migration),
            Box::new(m20240301_000011_create_dispute::Migration),
            Box::new(m20240301_000012_create_review::Migration),
            Box::new(m20240301_000013_create_conversation::Migration),
            Box::new(m20240301_000014_create_message::Migration),
            Box::new(m20240301_000015_create_notification::Migration),
            Box::new(m20240301_000016_create_referral::Migration),
            Box::new(m20240301_000017_create_subscription::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000018_add_indexes::Migration),
        ]
    }
}
