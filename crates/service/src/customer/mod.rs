//! Customers: freight clients with settlement terms and a per-kg rate.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::CustomerService;
