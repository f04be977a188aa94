//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access (repository traits with
//!   sea-orm and in-memory implementations).
//! - Reuses validation and entity definitions in `models` crate.
//! - Owns authentication, tokens and role-based authorization.

pub mod errors;
pub mod auth;
pub mod account;
pub mod department;
pub mod customer;
pub mod business;
pub mod registry;
pub mod mock;

pub use registry::Repositories;
