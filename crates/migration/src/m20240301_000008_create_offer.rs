//! Create `offer` table: price proposals on a booking.
//!
//! A counter-offer supersedes the previous pending one; only the latest
//! pending offer is actionable.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offer::Table)
                    .if_not_exists()
                    .col(uuid(Offer::Id).primary_key())
                    .col(uuid(Offer::BookingId).not_null())
                    .col(uuid(Offer::ProposedBy).not_null())
                    .col(big_integer(Offer::AmountCents).not_null())
                    .col(text(Offer::Message).not_null())
                    .col(string_len(Offer::Kind, 32).not_null())
                    .col(string_len(Offer::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Offer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Offer::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offer_booking")
                            .from(Offer::Table, Offer::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offer_proposer")
                            .from(Offer::Table, Offer::ProposedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Offer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Offer { Table, Id, BookingId, ProposedBy, AmountCents, Message, Kind, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Booking { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
