//! Auth module: token issuing, role-based permissions and the request gate.
//!
//! Login and refresh live in [`AuthService`]; per-request authorization in
//! [`gate::AuthGate`] and [`rbac`].

pub mod domain;
pub mod errors;
pub mod gate;
pub mod password;
pub mod rbac;
pub mod service;
pub mod token;

pub use service::AuthService;
