use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use common::types::ListPage;
use models::customer as rules;

use super::domain::{Customer, CustomerInput, CustomerPatch, CustomerQuery};
use super::repository::CustomerRepository;
use crate::department::repository::DepartmentRepository;
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    departments: Arc<dyn DepartmentRepository>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepository>, departments: Arc<dyn DepartmentRepository>) -> Self {
        Self { customers, departments }
    }

    #[instrument(skip(self, input), fields(company = %input.company_name))]
    pub async fn create(&self, mut input: CustomerInput) -> Result<Customer, ServiceError> {
        input.company_name = input.company_name.trim().to_string();
        input.settlement_method = input.settlement_method.trim().to_string();
        input.contact_person = input.contact_person.trim().to_string();
        input.contact_phone = input.contact_phone.trim().to_string();
        rules::validate_company_name(&input.company_name)?;
        rules::validate_settlement_method(&input.settlement_method)?;
        rules::validate_rate(input.rate)?;
        rules::validate_contact_person(&input.contact_person)?;
        rules::validate_contact_phone(&input.contact_phone)?;
        if let Some(d) = input.department_id {
            self.ensure_department(d).await?;
        }
        let customer = self.customers.create_customer(input).await?;
        info!(customer_id = %customer.id, "customer_created");
        Ok(customer)
    }

    pub async fn search(&self, query: CustomerQuery) -> Result<ListPage<Customer>, ServiceError> {
        let query = query.normalized();
        let (total, items) = self.customers.search_customers(&query).await?;
        Ok(ListPage::new(total, items))
    }

    pub async fn get(&self, id: Uuid) -> Result<Customer, ServiceError> {
        self.customers.find_customer(id).await?.ok_or_else(|| ServiceError::not_found("customer"))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, mut patch: CustomerPatch) -> Result<Customer, ServiceError> {
        self.get(id).await?;
        let trim = |v: &mut Option<String>| {
            if let Some(s) = v.as_mut() {
                *s = s.trim().to_string();
            }
        };
        trim(&mut patch.company_name);
        trim(&mut patch.settlement_method);
        trim(&mut patch.contact_person);
        trim(&mut patch.contact_phone);
        if let Some(v) = &patch.company_name { rules::validate_company_name(v)?; }
        if let Some(v) = &patch.settlement_method { rules::validate_settlement_method(v)?; }
        if let Some(v) = patch.rate { rules::validate_rate(v)?; }
        if let Some(v) = &patch.contact_person { rules::validate_contact_person(v)?; }
        if let Some(v) = &patch.contact_phone { rules::validate_contact_phone(v)?; }
        if let Some(Some(d)) = patch.department_id {
            self.ensure_department(d).await?;
        }
        let customer = self.customers.update_customer(id, patch).await?;
        info!(customer_id = %id, "customer_updated");
        Ok(customer)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.customers.delete_customer(id).await? {
            return Err(ServiceError::not_found("customer"));
        }
        info!(customer_id = %id, "customer_deleted");
        Ok(())
    }

    async fn ensure_department(&self, id: Uuid) -> Result<(), ServiceError> {
        match self.departments.find_department(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::Validation("department does not exist".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::pagination::Pagination;
    use crate::mock::MockStore;

    fn svc() -> CustomerService {
        let store = Arc::new(MockStore::default());
        CustomerService::new(store.clone(), store)
    }

    fn input(company: &str, person: &str) -> CustomerInput {
        CustomerInput {
            company_name: company.into(),
            settlement_method: "现结".into(),
            rate: 2.0,
            contact_person: person.into(),
            contact_phone: "13912345678".into(),
            department_id: None,
        }
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let s = svc();
        let mut bad = input("顺丰", "王五");
        bad.rate = -1.0;
        assert!(matches!(s.create(bad).await, Err(ServiceError::Validation(_))));
        let mut bad = input("顺丰", "王五");
        bad.department_id = Some(Uuid::new_v4());
        assert!(matches!(s.create(bad).await, Err(ServiceError::Validation(_))));
        assert!(matches!(s.create(input("  ", "王五")).await, Err(ServiceError::Validation(_))));

        let c = s.create(input(" 顺丰 ", "王五")).await.unwrap();
        assert_eq!(c.company_name, "顺丰");
    }

    #[tokio::test]
    async fn search_treats_percent_and_underscore_literally() {
        let s = svc();
        s.create(input("运价50%折扣", "张三")).await.unwrap();
        s.create(input("运价500", "李_四")).await.unwrap();
        s.create(input("运价5X0", "李某四")).await.unwrap();

        let page = s.search(CustomerQuery { company_name: Some("50%".into()), ..Default::default() }).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].company_name, "运价50%折扣");
        let page = s.search(CustomerQuery { contact_person: Some("_".into()), ..Default::default() }).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].contact_person, "李_四");
    }

    #[tokio::test]
    async fn search_filters_and_paginates_newest_first() {
        let s = svc();
        for i in 0..15 {
            s.create(input(&format!("货运公司{i}"), if i % 2 == 0 { "张三" } else { "李四" })).await.unwrap();
        }
        s.create(input("航空物流", "张三")).await.unwrap();

        let page = s.search(CustomerQuery { company_name: Some("货运".into()), ..Default::default() }).await.unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].company_name, "货运公司14");

        let page2 = s
            .search(CustomerQuery {
                company_name: Some("货运".into()),
                pagination: Pagination { page: 2, per_page: 10 },
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page2.items.len(), 5);

        let zhang = s.search(CustomerQuery { contact_person: Some("张三".into()), ..Default::default() }).await.unwrap();
        assert_eq!(zhang.total, 9);

        let all = s.search(CustomerQuery { company_name: Some("  ".into()), ..Default::default() }).await.unwrap();
        assert_eq!(all.total, 16);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let s = svc();
        let c = s.create(input("圆通", "赵六")).await.unwrap();
        let u = s.update(c.id, CustomerPatch { rate: Some(4.25), ..Default::default() }).await.unwrap();
        assert_eq!(u.rate, 4.25);
        assert_eq!(u.company_name, "圆通");
        assert!(matches!(s.update(c.id, CustomerPatch { rate: Some(-2.0), ..Default::default() }).await, Err(ServiceError::Validation(_))));

        s.delete(c.id).await.unwrap();
        assert!(matches!(s.delete(c.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(s.update(c.id, CustomerPatch::default()).await, Err(ServiceError::NotFound(_))));
    }
}
