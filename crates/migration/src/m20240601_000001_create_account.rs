//! Create `account` table.
//!
//! `roles` holds a JSON array of role codes; `token_version` is bumped whenever
//! previously issued tokens must stop working.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(uuid(Account::Id).primary_key())
                    .col(string_len(Account::Phone, 11).unique_key().not_null())
                    .col(string_len(Account::Name, 50).not_null())
                    .col(text(Account::Roles).not_null())
                    .col(boolean(Account::IsActive).not_null().default(true))
                    .col(big_integer(Account::TokenVersion).not_null().default(0))
                    .col(timestamp_with_time_zone(Account::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Account::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Account::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Account { Table, Id, Phone, Name, Roles, IsActive, TokenVersion, CreatedAt, UpdatedAt }
