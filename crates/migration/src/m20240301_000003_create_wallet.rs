//! Create `wallet` table, one per user, created at registration.
//!
//! Balances are integer cents; `pending_cents` holds escrowed funds that have
//! not been released yet.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wallet::Table)
                    .if_not_exists()
                    .col(uuid(Wallet::Id).primary_key())
                    .col(uuid(Wallet::UserId).unique_key().not_null())
                    .col(big_integer(Wallet::BalanceCents).not_null())
                    .col(big_integer(Wallet::PendingCents).not_null())
                    .col(string_len(Wallet::Currency, 8).not_null())
                    .col(timestamp_with_time_zone(Wallet::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Wallet::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallet_user")
                            .from(Wallet::Table, Wallet::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Wallet::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Wallet { Table, Id, UserId, BalanceCents, PendingCents, Currency, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
