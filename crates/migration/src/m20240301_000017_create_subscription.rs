//! Create `subscription` table: vendor plan membership.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(uuid(Subscription::Id).primary_key())
                    .col(uuid(Subscription::VendorId).not_null())
                    .col(string_len(Subscription::Plan, 32).not_null())
                    .col(string_len(Subscription::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Subscription::CurrentPeriodEnd).not_null())
                    .col(timestamp_with_time_zone(Subscription::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subscription::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_vendor")
                            .from(Subscription::Table, Subscription::VendorId)
                            .to(Vendor::Table, Vendor::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscription { Table, Id, VendorId, Plan, Status, CurrentPeriodEnd, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Vendor { Table, Id }
