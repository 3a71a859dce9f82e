//! Create `dispute` table: escalation path for a contested booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dispute::Table)
                    .if_not_exists()
                    .col(uuid(Dispute::Id).primary_key())
                    .col(uuid(Dispute::BookingId).not_null())
                    .col(uuid(Dispute::RaisedBy).not_null())
                    .col(text(Dispute::Reason).not_null())
                    .col(string_len(Dispute::Priority, 32).not_null())
                    .col(string_len(Dispute::Status, 32).not_null())
                    .col(ColumnDef::new(Dispute::Resolution).text().null())
                    .col(timestamp_with_time_zone(Dispute::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Dispute::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispute_booking")
                            .from(Dispute::Table, Dispute::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispute_raiser")
                            .from(Dispute::Table, Dispute::RaisedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Dispute::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Dispute { Table, Id, BookingId, RaisedBy, Reason, Priority, Status, Resolution, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Booking { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
