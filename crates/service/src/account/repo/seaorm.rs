use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use models::{account, account_credentials, account_department, department};

use crate::account::domain::{Account, AccountPatch, Credentials, DepartmentRef, NewAccount};
use crate::account::repository::AccountRepository;
use crate::auth::rbac::{roles_from_json, roles_to_json};
use crate::errors::ServiceError;

pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    /// Attach department memberships to the given rows, preserving order.
    async fn hydrate<C: ConnectionTrait>(db: &C, rows: Vec<account::Model>) -> Result<Vec<Account>, ServiceError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut by_account: HashMap<Uuid, Vec<DepartmentRef>> = HashMap::new();
        if !ids.is_empty() {
            let links = account_department::Entity::find()
                .filter(account_department::Column::AccountId.is_in(ids))
                .find_also_related(department::Entity)
                .all(db)
                .await?;
            for (link, dept) in links {
                if let Some(d) = dept {
                    by_account.entry(link.account_id).or_default().push(DepartmentRef { id: d.id, name: d.name });
                }
            }
        }
        Ok(rows
            .into_iter()
            .map(|m| {
                let departments = by_account.remove(&m.id).unwrap_or_default();
                to_domain(m, departments)
            })
            .collect())
    }

    async fn load<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Account>, ServiceError> {
        match account::Entity::find_by_id(id).one(db).await? {
            Some(m) => Ok(Self::hydrate(db, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn replace_memberships<C: ConnectionTrait>(db: &C, account_id: Uuid, department_ids: &[Uuid]) -> Result<(), ServiceError> {
        account_department::Entity::delete_many()
            .filter(account_department::Column::AccountId.eq(account_id))
            .exec(db)
            .await?;
        if department_ids.is_empty() {
            return Ok(());
        }
        let links = department_ids.iter().map(|d| account_department::ActiveModel {
            account_id: Set(account_id),
            department_id: Set(*d),
        });
        account_department::Entity::insert_many(links).exec_without_returning(db).await?;
        Ok(())
    }

    /// token_version += 1 for every id.
    async fn bump_versions<C: ConnectionTrait>(db: &C, ids: &[Uuid]) -> Result<(), ServiceError> {
        account::Entity::update_many()
            .col_expr(account::Column::TokenVersion, Expr::col(account::Column::TokenVersion).add(1))
            .col_expr(account::Column::UpdatedAt, Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())))
            .filter(account::Column::Id.is_in(ids.to_vec()))
            .exec(db)
            .await?;
        Ok(())
    }
}

fn to_domain(m: account::Model, departments: Vec<DepartmentRef>) -> Account {
    Account {
        id: m.id,
        roles: roles_from_json(&m.roles),
        phone: m.phone,
        name: m.name,
        is_active: m.is_active,
        token_version: m.token_version,
        departments,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ServiceError> {
        Self::load(&self.db, id).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, ServiceError> {
        let row = account::Entity::find()
            .filter(account::Column::Phone.eq(phone.to_string()))
            .one(&self.db)
            .await?;
        match row {
            Some(m) => Ok(Self::hydrate(&self.db, vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Account>, ServiceError> {
        let rows = account::Entity::find()
            .order_by_desc(account::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Self::hydrate(&self.db, rows).await
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = account::Entity::find()
            .filter(account::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| m.id).collect())
    }

    async fn create(&self, input: NewAccount) -> Result<Account, ServiceError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let am = account::ActiveModel {
            id: Set(Uuid::new_v4()),
            phone: Set(input.phone),
            name: Set(input.name),
            roles: Set(roles_to_json(&input.roles)),
            is_active: Set(true),
            token_version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = am.insert(&txn).await?;
        account_credentials::upsert_password(&txn, created.id, input.password_hash, &input.password_algorithm).await?;
        Self::replace_memberships(&txn, created.id, &input.department_ids).await?;
        let account = Self::load(&txn, created.id).await?.ok_or_else(|| ServiceError::not_found("account"))?;
        txn.commit().await?;
        Ok(account)
    }

    async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<Account, ServiceError> {
        let txn = self.db.begin().await?;
        let existing = account::Entity::find_by_id(id).one(&txn).await?.ok_or_else(|| ServiceError::not_found("account"))?;
        let revoke = patch.revokes_tokens();
        let mut am: account::ActiveModel = existing.into();
        if let Some(phone) = patch.phone { am.phone = Set(phone); }
        if let Some(name) = patch.name { am.name = Set(name); }
        if let Some(roles) = &patch.roles { am.roles = Set(roles_to_json(roles)); }
        am.updated_at = Set(Utc::now().into());
        am.update(&txn).await?;
        if revoke {
            Self::bump_versions(&txn, &[id]).await?;
        }
        if let Some(deps) = &patch.department_ids {
            Self::replace_memberships(&txn, id, deps).await?;
        }
        let account = Self::load(&txn, id).await?.ok_or_else(|| ServiceError::not_found("account"))?;
        txn.commit().await?;
        Ok(account)
    }

    async fn set_active(&self, ids: &[Uuid], active: bool) -> Result<u64, ServiceError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let res = account::Entity::update_many()
            .col_expr(account::Column::IsActive, Expr::value(active))
            .col_expr(account::Column::TokenVersion, Expr::col(account::Column::TokenVersion).add(1))
            .col_expr(account::Column::UpdatedAt, Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())))
            .filter(account::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn delete(&self, ids: &[Uuid]) -> Result<u64, ServiceError> {
        if ids.is_empty() {
            return Ok(0);
        }
        // 凭据、成员关系、业务配置由外键级联删除；部门负责人置空
        let res = account::Entity::delete_many()
            .filter(account::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn get_credentials(&self, id: Uuid) -> Result<Option<Credentials>, ServiceError> {
        let res = account_credentials::Entity::find()
            .filter(account_credentials::Column::AccountId.eq(id))
            .one(&self.db)
            .await?;
        Ok(res.map(|c| Credentials { account_id: c.account_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn set_password(&self, id: Uuid, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        account_credentials::upsert_password(&txn, id, password_hash, password_algorithm).await?;
        Self::bump_versions(&txn, &[id]).await?;
        txn.commit().await?;
        Ok(())
    }
}
