pub mod auth;
pub mod config;
pub mod errors;
pub mod expense;
pub mod extractors;
pub mod graphql;
pub mod sanitize;
pub mod state;
pub mod store;
