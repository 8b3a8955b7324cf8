//! # eBike Rental Service
//!
//! Lets registered users reserve and release shared electric bikes.
//!
//! ## Architecture
//!
//! - **domain**: Bikes, reservations, users and the repository traits
//! - **application**: Rental logic keeping bikes and reservations consistent
//! - **infrastructure**: SeaORM storage, migrations and an in-memory store
//! - **api**: REST API with Swagger documentation
//! - **support**: Errors and graceful shutdown

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use api::create_api_router;
