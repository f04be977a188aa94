use crate::db::{connect, migrate};
use crate::{account, account_credentials, account_department, business_parameter, customer, department};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Connect and migrate, or `None` when no database is configured for tests.
async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let db = connect().await?;
    migrate(&db).await?;
    Ok(Some(db))
}

fn unique_phone() -> String {
    let n = Uuid::new_v4().as_u128() % 10_000_000_000;
    format!("1{:010}", n)
}

async fn insert_account(db: &DatabaseConnection) -> Result<account::Model> {
    let now = Utc::now().into();
    let am = account::ActiveModel {
        id: Set(Uuid::new_v4()),
        phone: Set(unique_phone()),
        name: Set("测试账号".into()),
        roles: Set(r#"["waybill"]"#.into()),
        is_active: Set(true),
        token_version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn test_credentials_upsert_keeps_single_row() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let acc = insert_account(&db).await?;

    let first = account_credentials::upsert_password(&db, acc.id, "hash-1".into(), "argon2").await?;
    let second = account_credentials::upsert_password(&db, acc.id, "hash-2".into(), "argon2").await?;
    assert_eq!(first.id, second.id);

    let rows = account_credentials::Entity::find()
        .filter(account_credentials::Column::AccountId.eq(acc.id))
        .all(&db)
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].password_hash, "hash-2");

    // cascade removes the credential row
    account::Entity::delete_by_id(acc.id).exec(&db).await?;
    let gone = account_credentials::Entity::find_by_id(first.id).one(&db).await?;
    assert!(gone.is_none());
    Ok(())
}

#[tokio::test]
async fn test_department_with_customer_cannot_be_deleted() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let now = Utc::now().into();
    let dept = department::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("dept_{}", Uuid::new_v4())),
        owner_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let acc = insert_account(&db).await?;
    account_department::ActiveModel { account_id: Set(acc.id), department_id: Set(dept.id) }
        .insert(&db)
        .await?;

    let cust = customer::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_name: Set("深圳航空货运".into()),
        settlement_method: Set("月结".into()),
        rate: Set(3.5),
        contact_person: Set("李四".into()),
        contact_phone: Set("13900000000".into()),
        department_id: Set(Some(dept.id)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    // RESTRICT on customer.department_id
    assert!(department::Entity::delete_by_id(dept.id).exec(&db).await.is_err());

    customer::Entity::delete_by_id(cust.id).exec(&db).await?;
    department::Entity::delete_by_id(dept.id).exec(&db).await?;

    // membership cascades with the department
    let members = account_department::Entity::find()
        .filter(account_department::Column::AccountId.eq(acc.id))
        .all(&db)
        .await?;
    assert!(members.is_empty());

    account::Entity::delete_by_id(acc.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_business_parameter_upsert_round_trip() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    let key = format!("test.{}", Uuid::new_v4().simple());

    business_parameter::upsert(&db, &key, "PEK", Some("始发站".into())).await?;
    let updated = business_parameter::upsert(&db, &key, "SZX", None).await?;
    assert_eq!(updated.value, "SZX");
    // description kept when not supplied
    assert_eq!(updated.description.as_deref(), Some("始发站"));

    let found = business_parameter::Entity::find_by_id(key.clone()).one(&db).await?;
    assert_eq!(found.map(|p| p.value), Some("SZX".to_string()));

    business_parameter::Entity::delete_by_id(key).exec(&db).await?;
    Ok(())
}
