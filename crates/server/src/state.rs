use service::account::AccountService;
use service::auth::gate::AuthGate;
use service::auth::token::TokenIssuer;
use service::auth::AuthService;
use service::business::BusinessService;
use service::customer::CustomerService;
use service::department::DepartmentService;
use service::Repositories;

/// Shared, immutable application state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub auth: AuthService,
    pub gate: AuthGate,
    pub accounts: AccountService,
    pub departments: DepartmentService,
    pub customers: CustomerService,
    pub business: BusinessService,
}

impl ServerState {
    pub fn new(repos: Repositories, tokens: TokenIssuer) -> Self {
        Self {
            auth: AuthService::new(repos.accounts.clone(), repos.business.clone(), tokens.clone()),
            gate: AuthGate::new(repos.accounts.clone(), tokens),
            accounts: AccountService::new(repos.accounts.clone(), repos.departments.clone()),
            departments: DepartmentService::new(repos.departments.clone(), repos.customers.clone(), repos.accounts.clone()),
            customers: CustomerService::new(repos.customers.clone(), repos.departments),
            business: BusinessService::new(repos.business),
        }
    }
}
