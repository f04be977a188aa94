//! In-memory repositories for tests and doc examples.
//!
//! One [`MockStore`] implements every repository trait over shared tables so
//! cross-table rules (memberships, cascades) behave like the database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::account::domain::{Account, AccountPatch, Credentials, DepartmentRef, NewAccount};
use crate::account::repository::AccountRepository;
use crate::business::domain::{BusinessConfig, BusinessParameter};
use crate::business::repository::{BusinessRepository, CONFIG_ALREADY_INITIALIZED};
use crate::customer::domain::{Customer, CustomerInput, CustomerPatch, CustomerQuery};
use crate::customer::repository::CustomerRepository;
use crate::department::domain::{Department, DepartmentPatch};
use crate::department::repository::DepartmentRepository;
use crate::errors::ServiceError;

#[derive(Default)]
struct Tables {
    seq: u64,
    accounts: HashMap<Uuid, (u64, Account)>,
    memberships: HashSet<(Uuid, Uuid)>, // (account_id, department_id)
    credentials: HashMap<Uuid, Credentials>,
    departments: HashMap<Uuid, (u64, Department)>,
    customers: HashMap<Uuid, (u64, Customer)>,
    parameters: BTreeMap<String, BusinessParameter>,
    configs: HashMap<Uuid, BusinessConfig>, // key: account_id
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Account with its memberships resolved.
    fn account(&self, id: Uuid) -> Option<Account> {
        let (_, acc) = self.accounts.get(&id)?;
        let mut acc = acc.clone();
        let mut deps: Vec<(u64, DepartmentRef)> = self
            .memberships
            .iter()
            .filter(|(a, _)| *a == id)
            .filter_map(|(_, d)| self.departments.get(d))
            .map(|(seq, d)| (*seq, DepartmentRef { id: d.id, name: d.name.clone() }))
            .collect();
        deps.sort_by_key(|(seq, _)| *seq);
        acc.departments = deps.into_iter().map(|(_, d)| d).collect();
        Some(acc)
    }

    fn set_memberships(&mut self, account_id: Uuid, department_ids: &[Uuid]) {
        self.memberships.retain(|(a, _)| *a != account_id);
        for d in department_ids {
            self.memberships.insert((account_id, *d));
        }
    }

    fn bump(&mut self, id: Uuid) {
        if let Some((_, acc)) = self.accounts.get_mut(&id) {
            acc.token_version += 1;
            acc.updated_at = Utc::now();
        }
    }
}

#[derive(Default)]
pub struct MockStore {
    tables: Mutex<Tables>,
}

impl MockStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, ServiceError> {
        self.tables.lock().map_err(|_| ServiceError::Db("mock store poisoned".into()))
    }
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = (u64, T)>) -> Vec<T> {
    let mut rows: Vec<(u64, T)> = rows.collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0));
    rows.into_iter().map(|(_, t)| t).collect()
}

#[async_trait]
impl AccountRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ServiceError> {
        Ok(self.tables()?.account(id))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, ServiceError> {
        let t = self.tables()?;
        let id = t.accounts.values().find(|(_, a)| a.phone == phone).map(|(_, a)| a.id);
        Ok(id.and_then(|id| t.account(id)))
    }

    async fn list(&self) -> Result<Vec<Account>, ServiceError> {
        let t = self.tables()?;
        let ids = newest_first(t.accounts.values().map(|(seq, a)| (*seq, a.id)));
        Ok(ids.into_iter().filter_map(|id| t.account(id)).collect())
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError> {
        let t = self.tables()?;
        Ok(ids.iter().copied().filter(|id| t.accounts.contains_key(id)).collect())
    }

    async fn create(&self, input: NewAccount) -> Result<Account, ServiceError> {
        let mut t = self.tables()?;
        if t.accounts.values().any(|(_, a)| a.phone == input.phone) {
            return Err(ServiceError::Conflict("phone already registered".into()));
        }
        if input.department_ids.iter().any(|d| !t.departments.contains_key(d)) {
            return Err(ServiceError::Conflict("department does not exist".into()));
        }
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            phone: input.phone,
            name: input.name,
            roles: input.roles,
            is_active: true,
            token_version: 0,
            departments: vec![],
            created_at: now,
            updated_at: now,
        };
        let id = account.id;
        let seq = t.next_seq();
        t.accounts.insert(id, (seq, account));
        t.credentials.insert(id, Credentials { account_id: id, password_hash: input.password_hash, password_algorithm: input.password_algorithm });
        t.set_memberships(id, &input.department_ids);
        t.account(id).ok_or_else(|| ServiceError::not_found("account"))
    }

    async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<Account, ServiceError> {
        let mut t = self.tables()?;
        if let Some(phone) = &patch.phone {
            if t.accounts.values().any(|(_, a)| &a.phone == phone && a.id != id) {
                return Err(ServiceError::Conflict("phone already registered".into()));
            }
        }
        let revoke = patch.revokes_tokens();
        {
            let (_, acc) = t.accounts.get_mut(&id).ok_or_else(|| ServiceError::not_found("account"))?;
            if let Some(phone) = patch.phone { acc.phone = phone; }
            if let Some(name) = patch.name { acc.name = name; }
            if let Some(roles) = patch.roles { acc.roles = roles; }
            acc.updated_at = Utc::now();
        }
        if revoke {
            t.bump(id);
        }
        if let Some(deps) = patch.department_ids {
            t.set_memberships(id, &deps);
        }
        t.account(id).ok_or_else(|| ServiceError::not_found("account"))
    }

    async fn set_active(&self, ids: &[Uuid], active: bool) -> Result<u64, ServiceError> {
        let mut t = self.tables()?;
        let mut n = 0;
        for id in ids {
            if let Some((_, acc)) = t.accounts.get_mut(id) {
                acc.is_active = active;
                n += 1;
                t.bump(*id);
            }
        }
        Ok(n)
    }

    async fn delete(&self, ids: &[Uuid]) -> Result<u64, ServiceError> {
        let mut t = self.tables()?;
        let mut n = 0;
        for id in ids {
            if t.accounts.remove(id).is_some() {
                n += 1;
                t.credentials.remove(id);
                t.configs.remove(id);
                t.memberships.retain(|(a, _)| a != id);
                for (_, d) in t.departments.values_mut() {
                    if d.owner_id == Some(*id) {
                        d.owner_id = None;
                    }
                }
            }
        }
        Ok(n)
    }

    async fn get_credentials(&self, id: Uuid) -> Result<Option<Credentials>, ServiceError> {
        Ok(self.tables()?.credentials.get(&id).cloned())
    }

    async fn set_password(&self, id: Uuid, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError> {
        let mut t = self.tables()?;
        if !t.accounts.contains_key(&id) {
            return Err(ServiceError::not_found("account"));
        }
        t.credentials.insert(id, Credentials { account_id: id, password_hash, password_algorithm: password_algorithm.to_string() });
        t.bump(id);
        Ok(())
    }
}

#[async_trait]
impl DepartmentRepository for MockStore {
    async fn find_department(&self, id: Uuid) -> Result<Option<Department>, ServiceError> {
        Ok(self.tables()?.departments.get(&id).map(|(_, d)| d.clone()))
    }

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>, ServiceError> {
        Ok(self.tables()?.departments.values().find(|(_, d)| d.name == name).map(|(_, d)| d.clone()))
    }

    async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        let t = self.tables()?;
        Ok(newest_first(t.departments.values().map(|(seq, d)| (*seq, d.clone()))))
    }

    async fn existing_department_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError> {
        let t = self.tables()?;
        Ok(ids.iter().copied().filter(|id| t.departments.contains_key(id)).collect())
    }

    async fn create_department(&self, name: &str, owner_id: Option<Uuid>) -> Result<Department, ServiceError> {
        let mut t = self.tables()?;
        if t.departments.values().any(|(_, d)| d.name == name) {
            return Err(ServiceError::Conflict("department name already exists".into()));
        }
        let now = Utc::now();
        let dept = Department { id: Uuid::new_v4(), name: name.to_string(), owner_id, created_at: now, updated_at: now };
        let seq = t.next_seq();
        t.departments.insert(dept.id, (seq, dept.clone()));
        Ok(dept)
    }

    async fn update_department(&self, id: Uuid, patch: DepartmentPatch) -> Result<Department, ServiceError> {
        let mut t = self.tables()?;
        if let Some(name) = &patch.name {
            if t.departments.values().any(|(_, d)| &d.name == name && d.id != id) {
                return Err(ServiceError::Conflict("department name already exists".into()));
            }
        }
        let (_, dept) = t.departments.get_mut(&id).ok_or_else(|| ServiceError::not_found("department"))?;
        if let Some(name) = patch.name { dept.name = name; }
        if let Some(owner) = patch.owner_id { dept.owner_id = owner; }
        dept.updated_at = Utc::now();
        Ok(dept.clone())
    }

    async fn delete_department(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.tables()?;
        // 与外键 RESTRICT 行为一致
        if t.customers.values().any(|(_, c)| c.department_id == Some(id)) {
            return Err(ServiceError::Conflict("department is referenced by customers".into()));
        }
        let removed = t.departments.remove(&id).is_some();
        t.memberships.retain(|(_, d)| *d != id);
        Ok(removed)
    }
}

#[async_trait]
impl CustomerRepository for MockStore {
    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, ServiceError> {
        Ok(self.tables()?.customers.get(&id).map(|(_, c)| c.clone()))
    }

    async fn search_customers(&self, query: &CustomerQuery) -> Result<(u64, Vec<Customer>), ServiceError> {
        let t = self.tables()?;
        let matched = newest_first(t.customers.values().filter(|(_, c)| query.matches(c)).map(|(seq, c)| (*seq, c.clone())));
        let (_, per_page) = query.pagination.normalize();
        let items = matched
            .iter()
            .skip(query.pagination.offset() as usize)
            .take(per_page as usize)
            .cloned()
            .collect();
        Ok((matched.len() as u64, items))
    }

    async fn create_customer(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        let mut t = self.tables()?;
        if let Some(d) = input.department_id {
            if !t.departments.contains_key(&d) {
                return Err(ServiceError::Conflict("department does not exist".into()));
            }
        }
        let now = Utc::now();
        let c = Customer {
            id: Uuid::new_v4(),
            company_name: input.company_name,
            settlement_method: input.settlement_method,
            rate: input.rate,
            contact_person: input.contact_person,
            contact_phone: input.contact_phone,
            department_id: input.department_id,
            created_at: now,
            updated_at: now,
        };
        let seq = t.next_seq();
        t.customers.insert(c.id, (seq, c.clone()));
        Ok(c)
    }

    async fn update_customer(&self, id: Uuid, patch: CustomerPatch) -> Result<Customer, ServiceError> {
        let mut t = self.tables()?;
        let (_, c) = t.customers.get_mut(&id).ok_or_else(|| ServiceError::not_found("customer"))?;
        if let Some(v) = patch.company_name { c.company_name = v; }
        if let Some(v) = patch.settlement_method { c.settlement_method = v; }
        if let Some(v) = patch.rate { c.rate = v; }
        if let Some(v) = patch.contact_person { c.contact_person = v; }
        if let Some(v) = patch.contact_phone { c.contact_phone = v; }
        if let Some(v) = patch.department_id { c.department_id = v; }
        c.updated_at = Utc::now();
        Ok(c.clone())
    }

    async fn delete_customer(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.tables()?.customers.remove(&id).is_some())
    }

    async fn count_by_department(&self, department_id: Uuid) -> Result<u64, ServiceError> {
        let t = self.tables()?;
        Ok(t.customers.values().filter(|(_, c)| c.department_id == Some(department_id)).count() as u64)
    }
}

#[async_trait]
impl BusinessRepository for MockStore {
    async fn get_parameter(&self, key: &str) -> Result<Option<BusinessParameter>, ServiceError> {
        Ok(self.tables()?.parameters.get(key).cloned())
    }

    async fn list_parameters(&self) -> Result<Vec<BusinessParameter>, ServiceError> {
        Ok(self.tables()?.parameters.values().cloned().collect())
    }

    async fn upsert_parameter(&self, key: &str, value: &str, description: Option<String>) -> Result<BusinessParameter, ServiceError> {
        let mut t = self.tables()?;
        let kept = t.parameters.get(key).and_then(|p| p.description.clone());
        let p = BusinessParameter {
            key: key.to_string(),
            value: value.to_string(),
            description: description.or(kept),
            updated_at: Utc::now(),
        };
        t.parameters.insert(key.to_string(), p.clone());
        Ok(p)
    }

    async fn delete_parameter(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.tables()?.parameters.remove(key).is_some())
    }

    async fn find_config(&self, account_id: Uuid) -> Result<Option<BusinessConfig>, ServiceError> {
        Ok(self.tables()?.configs.get(&account_id).cloned())
    }

    async fn insert_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<BusinessConfig, ServiceError> {
        let mut t = self.tables()?;
        if t.configs.contains_key(&account_id) {
            return Err(ServiceError::Validation(CONFIG_ALREADY_INITIALIZED.into()));
        }
        let now = Utc::now();
        let cfg = BusinessConfig { id: Uuid::new_v4(), account_id, config_data: data, created_at: now, updated_at: now };
        t.configs.insert(account_id, cfg.clone());
        Ok(cfg)
    }

    async fn update_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<Option<BusinessConfig>, ServiceError> {
        let mut t = self.tables()?;
        Ok(t.configs.get_mut(&account_id).map(|cfg| {
            cfg.config_data = data;
            cfg.updated_at = Utc::now();
            cfg.clone()
        }))
    }
}
