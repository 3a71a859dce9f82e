//! Create `referral` table linking a referrer to the user they brought in.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Referral::Table)
                    .if_not_exists()
                    .col(uuid(Referral::Id).primary_key())
                    .col(uuid(Referral::ReferrerId).not_null())
                    .col(uuid(Referral::ReferredId).unique_key().not_null())
                    .col(string_len(Referral::Code, 16).not_null())
                    .col(string_len(Referral::Status, 32).not_null())
                    .col(big_integer(Referral::RewardCents).not_null())
                    .col(timestamp_with_time_zone(Referral::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Referral::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referral_referrer")
                            .from(Referral::Table, Referral::ReferrerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_referral_referred")
                            .from(Referral::Table, Referral::ReferredId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Referral::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Referral { Table, Id, ReferrerId, ReferredId, Code, Status, RewardCents, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
