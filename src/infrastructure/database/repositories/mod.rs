//! SeaORM repository implementations

pub mod event_repository;
pub mod registration_repository;
pub mod repository_provider;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
