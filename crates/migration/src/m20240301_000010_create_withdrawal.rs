//! Create `withdrawal` table: requests to move wallet balance out.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Withdrawal::Table)
                    .if_not_exists()
                    .col(uuid(Withdrawal::Id).primary_key())
                    .col(uuid(Withdrawal::WalletId).not_null())
                    .col(big_integer(Withdrawal::AmountCents).not_null())
                    .col(string_len(Withdrawal::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Withdrawal::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Withdrawal::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_withdrawal_wallet")
                            .from(Withdrawal::Table, Withdrawal::WalletId)
                            .to(Wallet::Table, Wallet::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Withdrawal::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Withdrawal { Table, Id, WalletId, AmountCents, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Wallet { Table, Id }
