//! Business parameters (global key-value store) and per-account business config.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::BusinessService;
