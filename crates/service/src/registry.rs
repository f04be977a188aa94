//! Wiring of repository implementations.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::account::repo::seaorm::SeaOrmAccountRepository;
use crate::account::repository::AccountRepository;
use crate::business::repo::seaorm::SeaOrmBusinessRepository;
use crate::business::repository::BusinessRepository;
use crate::customer::repo::seaorm::SeaOrmCustomerRepository;
use crate::customer::repository::CustomerRepository;
use crate::department::repo::seaorm::SeaOrmDepartmentRepository;
use crate::department::repository::DepartmentRepository;

#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub departments: Arc<dyn DepartmentRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub business: Arc<dyn BusinessRepository>,
}

impl Repositories {
    pub fn seaorm(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(SeaOrmAccountRepository { db: db.clone() }),
            departments: Arc::new(SeaOrmDepartmentRepository { db: db.clone() }),
            customers: Arc::new(SeaOrmCustomerRepository { db: db.clone() }),
            business: Arc::new(SeaOrmBusinessRepository { db }),
        }
    }

    /// One store backing every repository, e.g. [`crate::mock::MockStore`].
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: AccountRepository + DepartmentRepository + CustomerRepository + BusinessRepository + 'static,
    {
        Self {
            accounts: store.clone(),
            departments: store.clone(),
            customers: store.clone(),
            business: store,
        }
    }
}
