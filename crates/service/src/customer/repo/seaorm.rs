use chrono::Utc;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use models::customer;

use crate::customer::domain::{Customer, CustomerInput, CustomerPatch, CustomerQuery};
use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;

pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: customer::Model) -> Customer {
    Customer {
        id: m.id,
        company_name: m.company_name,
        settlement_method: m.settlement_method,
        rate: m.rate,
        contact_person: m.contact_person,
        contact_phone: m.contact_phone,
        department_id: m.department_id,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

/// `%needle%` with LIKE metacharacters escaped by `\`.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Literal substring match, the same as `CustomerQuery::matches`.
fn substring_pattern(needle: &str) -> LikeExpr {
    LikeExpr::new(escape_like(needle)).escape('\\')
}

fn condition(query: &CustomerQuery) -> Condition {
    let mut cond = Condition::all();
    if let Some(name) = &query.company_name {
        cond = cond.add(customer::Column::CompanyName.like(substring_pattern(name)));
    }
    if let Some(person) = &query.contact_person {
        cond = cond.add(customer::Column::ContactPerson.like(substring_pattern(person)));
    }
    if let Some(dept) = query.department_id {
        cond = cond.add(customer::Column::DepartmentId.eq(dept));
    }
    cond
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, ServiceError> {
        Ok(customer::Entity::find_by_id(id).one(&self.db).await?.map(to_domain))
    }

    async fn search_customers(&self, query: &CustomerQuery) -> Result<(u64, Vec<Customer>), ServiceError> {
        let select = customer::Entity::find().filter(condition(query));
        let total = select.clone().count(&self.db).await?;
        let (_, per_page) = query.pagination.normalize();
        let rows = select
            .order_by_desc(customer::Column::CreatedAt)
            .offset(query.pagination.offset())
            .limit(per_page)
            .all(&self.db)
            .await?;
        Ok((total, rows.into_iter().map(to_domain).collect()))
    }

    async fn create_customer(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        let now = Utc::now().into();
        let am = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_name: Set(input.company_name),
            settlement_method: Set(input.settlement_method),
            rate: Set(input.rate),
            contact_person: Set(input.contact_person),
            contact_phone: Set(input.contact_phone),
            department_id: Set(input.department_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(to_domain(am.insert(&self.db).await?))
    }

    async fn update_customer(&self, id: Uuid, patch: CustomerPatch) -> Result<Customer, ServiceError> {
        let existing = customer::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("customer"))?;
        let mut am: customer::ActiveModel = existing.into();
        if let Some(v) = patch.company_name { am.company_name = Set(v); }
        if let Some(v) = patch.settlement_method { am.settlement_method = Set(v); }
        if let Some(v) = patch.rate { am.rate = Set(v); }
        if let Some(v) = patch.contact_person { am.contact_person = Set(v); }
        if let Some(v) = patch.contact_phone { am.contact_phone = Set(v); }
        if let Some(v) = patch.department_id { am.department_id = Set(v); }
        am.updated_at = Set(Utc::now().into());
        Ok(to_domain(am.update(&self.db).await?))
    }

    async fn delete_customer(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = customer::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn count_by_department(&self, department_id: Uuid) -> Result<u64, ServiceError> {
        let n = customer::Entity::find()
            .filter(customer::Column::DepartmentId.eq(department_id))
            .count(&self.db)
            .await?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn wildcards_in_filters_are_escaped() {
        let query = CustomerQuery { company_name: Some("50%_off".into()), ..Default::default() };
        let sql = customer::Entity::find().filter(condition(&query)).build(DbBackend::Postgres).to_string();
        assert!(sql.contains("LIKE"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn like_metacharacters_are_literal() {
        assert_eq!(escape_like("50%_off"), r"%50\%\_off%");
        assert_eq!(escape_like(r"a\b"), r"%a\\b%");
        assert_eq!(escape_like("国航"), "%国航%");
    }
}
