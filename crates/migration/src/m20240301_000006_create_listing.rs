//! Create `listing` table: a service a vendor offers for booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(uuid(Listing::Id).primary_key())
                    .col(uuid(Listing::VendorId).not_null())
                    .col(uuid(Listing::CategoryId).not_null())
                    .col(string_len(Listing::Title, 160).not_null())
                    .col(text(Listing::Description).not_null())
                    .col(big_integer(Listing::PriceCents).not_null())
                    .col(string_len(Listing::Currency, 8).not_null())
                    .col(integer(Listing::DurationMinutes).not_null())
                    .col(string_len(Listing::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Listing::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Listing::UpdatedAt).not_null())
                    .col(
                        ColumnDef::new(Listing::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_vendor")
                            .from(Listing::Table, Listing::VendorId)
                            .to(Vendor::Table, Vendor::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_category")
                            .from(Listing::Table, Listing::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Listing::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Listing {
    Table,
    Id,
    VendorId,
    CategoryId,
    Title,
    Description,
    PriceCents,
    Currency,
    DurationMinutes,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Vendor { Table, Id }

#[derive(DeriveIden)]
enum Category { Table, Id }
