/// CRUD round-trips against a live PostgreSQL database.
pub mod crud_tests;
