//! Create `conversation` table: a two-party chat thread, optionally bound to a booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Conversation::Table)
                    .if_not_exists()
                    .col(uuid(Conversation::Id).primary_key())
                    .col(ColumnDef::new(Conversation::BookingId).uuid().null())
                    .col(uuid(Conversation::ParticipantA).not_null())
                    .col(uuid(Conversation::ParticipantB).not_null())
                    .col(timestamp_with_time_zone(Conversation::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Conversation::LastMessageAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_booking")
                            .from(Conversation::Table, Conversation::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_participant_a")
                            .from(Conversation::Table, Conversation::ParticipantA)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_participant_b")
                            .from(Conversation::Table, Conversation::ParticipantB)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Conversation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Conversation { Table, Id, BookingId, ParticipantA, ParticipantB, CreatedAt, LastMessageAt }

#[derive(DeriveIden)]
enum Booking { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
