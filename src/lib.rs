//! # EventHub
//!
//! Event registration backend: users, events and registrations over a
//! relational store, exposed as a REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: aggregate models, repository traits and the error taxonomy
//! - **application**: services enforcing the business rules, most notably
//!   the registration lifecycle (capacity, duplicates, publication and
//!   time-window gates)
//! - **infrastructure**: SeaORM persistence, migrations, JWT and password
//!   crypto
//! - **interfaces**: axum REST API with JWT middleware, authorization
//!   predicates and Swagger documentation
//! - **shared**: the clock abstraction and other cross-cutting pieces

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
