use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // AccountDepartment: reverse lookup by department
        manager
            .create_index(
                Index::create()
                    .name("idx_account_department_department")
                    .table(AccountDepartment::Table)
                    .col(AccountDepartment::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // Customer: search columns and owning department
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_company_name")
                    .table(Customer::Table)
                    .col(Customer::CompanyName)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_contact_person")
                    .table(Customer::Table)
                    .col(Customer::ContactPerson)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_customer_department")
                    .table(Customer::Table)
                    .col(Customer::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // Account: listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_account_created_at")
                    .table(Account::Table)
                    .col(Account::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_account_created_at").table(Account::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_customer_department").table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_customer_contact_person").table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_customer_company_name").table(Customer::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_account_department_department")
                    .table(AccountDepartment::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Account { Table, CreatedAt }

#[derive(DeriveIden)]
enum AccountDepartment { Table, DepartmentId }

#[derive(DeriveIden)]
enum Customer { Table, CompanyName, ContactPerson, DepartmentId }
