//! Create `business_parameter` key-value table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BusinessParameter::Table)
                    .if_not_exists()
                    .col(string_len(BusinessParameter::Key, 100).primary_key())
                    .col(text(BusinessParameter::Value).not_null())
                    .col(ColumnDef::new(BusinessParameter::Description).string_len(255).null())
                    .col(timestamp_with_time_zone(BusinessParameter::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessParameter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BusinessParameter { Table, Key, Value, Description, UpdatedAt }
