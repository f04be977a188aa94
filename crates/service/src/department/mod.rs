//! Departments and their account memberships.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::DepartmentService;
