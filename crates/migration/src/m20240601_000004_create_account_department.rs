//! Create `account_department` join table (many-to-many membership).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountDepartment::Table)
                    .if_not_exists()
                    .col(uuid(AccountDepartment::AccountId).not_null())
                    .col(uuid(AccountDepartment::DepartmentId).not_null())
                    .primary_key(
                        Index::create()
                            .col(AccountDepartment::AccountId)
                            .col(AccountDepartment::DepartmentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_department_account")
                            .from(AccountDepartment::Table, AccountDepartment::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_department_department")
                            .from(AccountDepartment::Table, AccountDepartment::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountDepartment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccountDepartment { Table, AccountId, DepartmentId }

#[derive(DeriveIden)]
enum Account { Table, Id }

#[derive(DeriveIden)]
enum Department { Table, Id }
