//! Create `business_config` table: one JSON document per account.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessConfig::Table)
                    .if_not_exists()
                    .col(uuid(BusinessConfig::Id).primary_key())
                    .col(uuid(BusinessConfig::AccountId).unique_key().not_null())
                    .col(text(BusinessConfig::ConfigData).not_null())
                    .col(timestamp_with_time_zone(BusinessConfig::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BusinessConfig::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_config_account")
                            .from(BusinessConfig::Table, BusinessConfig::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessConfig::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BusinessConfig { Table, Id, AccountId, ConfigData, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Account { Table, Id }
