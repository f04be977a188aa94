use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::account::{domain::CreateAccountInput, AccountService};
use service::auth::domain::LoginInput;
use service::auth::rbac::{PermissionSet, Role, Operation};
use service::auth::token::TokenIssuer;
use service::auth::AuthService;
use service::mock::MockStore;

fn bench_login(c: &mut Criterion) {
    let store = Arc::new(MockStore::default());
    let tokens = TokenIssuer::new("secret", chrono::Duration::minutes(30), chrono::Duration::days(90));
    let accounts = AccountService::new(store.clone(), store.clone());
    let svc = AuthService::new(store.clone(), store, tokens);

    // pre-create account outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(accounts.create(CreateAccountInput {
        phone: "13800000000".into(),
        password: "Benchmark1".into(),
        name: "Bench".into(),
        department_ids: vec![],
        roles: vec!["admin".into()],
    }))
    .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { phone: "13800000000".into(), password: "Benchmark1".into() })).unwrap();
        });
    });
}

fn bench_permission_check(c: &mut Criterion) {
    c.bench_function("rbac_resolve_and_check", |b| {
        b.iter(|| {
            let p = PermissionSet::from_roles(&[Role::Waybill, Role::Booking]);
            p.allows(Operation::AccountManage)
        });
    });
}

criterion_group!(benches, bench_login, bench_permission_check);
criterion_main!(benches);
