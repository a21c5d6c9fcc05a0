//! Skills catalog: REST backend for learning resources, themes, skills and resource-skill links.

pub mod config;
pub mod docs;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::{AppConfig, DbConfig};
pub use error::{AppError, ConfigError};
pub use routes::app;
pub use service::CrudService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, PgStore, Store};
