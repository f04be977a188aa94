//! Create `department` table with an optional owner account.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(uuid(Department::Id).primary_key())
                    .col(string_len(Department::Name, 100).unique_key().not_null())
                    // Explicitly nullable: departments may have no owner
                    .col(ColumnDef::new(Department::OwnerId).uuid().null())
                    .col(timestamp_with_time_zone(Department::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Department::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_owner")
                            .from(Department::Table, Department::OwnerId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Department::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Department { Table, Id, Name, OwnerId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Account { Table, Id }
