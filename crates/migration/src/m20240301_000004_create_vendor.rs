//! Create `vendor` table: the seller profile layered over a user account.
//!
//! `rating_avg_bp` stores the review average in basis points (1..=5 stars maps
//! to 100..=500) so the column stays integral.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vendor::Table)
                    .if_not_exists()
                    .col(uuid(Vendor::Id).primary_key())
                    .col(uuid(Vendor::UserId).unique_key().not_null())
                    .col(string_len(Vendor::DisplayName, 128).not_null())
                    .col(text(Vendor::Bio).not_null())
                    .col(integer(Vendor::RatingAvgBp).not_null())
                    .col(integer(Vendor::RatingCount).not_null())
                    .col(string_len(Vendor::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Vendor::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Vendor::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_user")
                            .from(Vendor::Table, Vendor::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Vendor::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Vendor { Table, Id, UserId, DisplayName, Bio, RatingAvgBp, RatingCount, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
