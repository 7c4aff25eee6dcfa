//! HTTP REST API interfaces
//!
//! - `middleware`: JWT authentication middleware
//! - `access`: authorization predicates evaluated in handlers
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with Swagger documentation

pub mod access;
pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
