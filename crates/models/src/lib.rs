pub mod errors;
pub mod db;
pub mod account;
pub mod account_credentials;
pub mod account_department;
pub mod department;
pub mod customer;
pub mod business_parameter;
pub mod business_config;

#[cfg(test)]
mod tests;
