//! Accounts: identity, roles, department memberships and credentials.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::AccountService;
