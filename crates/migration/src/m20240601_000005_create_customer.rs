//! Create `customer` table.
//!
//! The department FK is RESTRICT: a department that still owns customers
//! cannot be deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(string_len(Customer::CompanyName, 200).not_null())
                    .col(string_len(Customer::SettlementMethod, 50).not_null())
                    .col(double(Customer::Rate).not_null())
                    .col(string_len(Customer::ContactPerson, 50).not_null())
                    .col(string_len(Customer::ContactPhone, 20).not_null())
                    .col(ColumnDef::new(Customer::DepartmentId).uuid().null())
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_department")
                            .from(Customer::Table, Customer::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer {
    Table,
    Id,
    CompanyName,
    SettlementMethod,
    Rate,
    ContactPerson,
    ContactPhone,
    DepartmentId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Department { Table, Id }
