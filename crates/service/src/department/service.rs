use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{Department, DepartmentInput, DepartmentPatch};
use super::repository::DepartmentRepository;
use crate::account::repository::AccountRepository;
use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct DepartmentService {
    departments: Arc<dyn DepartmentRepository>,
    customers: Arc<dyn CustomerRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl DepartmentService {
    pub fn new(
        departments: Arc<dyn DepartmentRepository>,
        customers: Arc<dyn CustomerRepository>,
        accounts: Arc<dyn AccountRepository>,
    ) -> Self {
        Self { departments, customers, accounts }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: DepartmentInput) -> Result<Department, ServiceError> {
        let name = input.name.trim();
        models::department::validate_name(name)?;
        if self.departments.find_department_by_name(name).await?.is_some() {
            return Err(ServiceError::Conflict("department name already exists".into()));
        }
        if let Some(owner) = input.owner_id {
            self.ensure_owner(owner).await?;
        }
        let dept = self.departments.create_department(name, input.owner_id).await?;
        info!(department_id = %dept.id, "department_created");
        Ok(dept)
    }

    pub async fn list(&self) -> Result<Vec<Department>, ServiceError> { self.departments.list_departments().await }

    pub async fn get(&self, id: Uuid) -> Result<Department, ServiceError> {
        self.departments.find_department(id).await?.ok_or_else(|| ServiceError::not_found("department"))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, mut patch: DepartmentPatch) -> Result<Department, ServiceError> {
        self.get(id).await?;
        if let Some(name) = patch.name.take() {
            let name = name.trim().to_string();
            models::department::validate_name(&name)?;
            if let Some(other) = self.departments.find_department_by_name(&name).await? {
                if other.id != id {
                    return Err(ServiceError::Conflict("department name already exists".into()));
                }
            }
            patch.name = Some(name);
        }
        if let Some(Some(owner)) = patch.owner_id {
            self.ensure_owner(owner).await?;
        }
        let dept = self.departments.update_department(id, patch).await?;
        info!(department_id = %id, "department_updated");
        Ok(dept)
    }

    /// Refused while customers still reference the department.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.get(id).await?;
        let customers = self.customers.count_by_department(id).await?;
        if customers > 0 {
            return Err(ServiceError::Conflict(format!("department still has {customers} customer(s)")));
        }
        self.departments.delete_department(id).await?;
        info!(department_id = %id, "department_deleted");
        Ok(())
    }

    async fn ensure_owner(&self, owner: Uuid) -> Result<(), ServiceError> {
        match self.accounts.find_by_id(owner).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::Validation("owner account does not exist".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::domain::CreateAccountInput;
    use crate::account::AccountService;
    use crate::customer::domain::CustomerInput;
    use crate::customer::CustomerService;
    use crate::mock::MockStore;

    fn svc() -> (Arc<MockStore>, DepartmentService) {
        let store = Arc::new(MockStore::default());
        (store.clone(), DepartmentService::new(store.clone(), store.clone(), store))
    }

    fn named(name: &str) -> DepartmentInput { DepartmentInput { name: name.into(), owner_id: None } }

    #[tokio::test]
    async fn names_are_unique_and_bounded() {
        let (_, s) = svc();
        let a = s.create(named("华南")).await.unwrap();
        assert!(matches!(s.create(named(" 华南 ")).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(s.create(named("")).await, Err(ServiceError::Validation(_))));
        assert!(matches!(s.create(named(&"d".repeat(101))).await, Err(ServiceError::Validation(_))));

        let b = s.create(named("华北")).await.unwrap();
        let r = s.update(b.id, DepartmentPatch { name: Some("华南".into()), owner_id: None }).await;
        assert!(matches!(r, Err(ServiceError::Conflict(_))));
        let renamed = s.update(a.id, DepartmentPatch { name: Some("华南一部".into()), owner_id: None }).await.unwrap();
        assert_eq!(renamed.name, "华南一部");
    }

    #[tokio::test]
    async fn owner_must_exist_and_can_be_cleared() {
        let (store, s) = svc();
        assert!(matches!(
            s.create(DepartmentInput { name: "x".into(), owner_id: Some(Uuid::new_v4()) }).await,
            Err(ServiceError::Validation(_))
        ));
        let accounts = AccountService::new(store.clone(), store.clone());
        let owner = accounts
            .create(CreateAccountInput { phone: "13700000000".into(), password: "secret1".into(), name: "O".into(), department_ids: vec![], roles: vec![] })
            .await
            .unwrap();
        let d = s.create(DepartmentInput { name: "x".into(), owner_id: Some(owner.id) }).await.unwrap();
        assert_eq!(d.owner_id, Some(owner.id));
        let d = s.update(d.id, DepartmentPatch { name: None, owner_id: Some(None) }).await.unwrap();
        assert_eq!(d.owner_id, None);
    }

    #[tokio::test]
    async fn delete_refused_while_customers_remain() {
        let (store, s) = svc();
        let customers = CustomerService::new(store.clone(), store.clone());
        let d = s.create(named("华东")).await.unwrap();
        let c = customers
            .create(CustomerInput {
                company_name: "东方航空货运".into(),
                settlement_method: "月结".into(),
                rate: 3.5,
                contact_person: "李四".into(),
                contact_phone: "021-12345678".into(),
                department_id: Some(d.id),
            })
            .await
            .unwrap();

        assert!(matches!(s.delete(d.id).await, Err(ServiceError::Conflict(_))));
        assert!(s.get(d.id).await.is_ok());

        customers.delete(c.id).await.unwrap();
        s.delete(d.id).await.unwrap();
        assert!(matches!(s.get(d.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_memberships() {
        let (store, s) = svc();
        let d = s.create(named("结算部")).await.unwrap();
        let accounts = AccountService::new(store.clone(), store.clone());
        let acc = accounts
            .create(CreateAccountInput { phone: "13700000001".into(), password: "secret1".into(), name: "M".into(), department_ids: vec![d.id], roles: vec![] })
            .await
            .unwrap();
        assert_eq!(acc.departments.len(), 1);

        s.delete(d.id).await.unwrap();
        assert!(accounts.get(acc.id).await.unwrap().departments.is_empty());
    }
}
