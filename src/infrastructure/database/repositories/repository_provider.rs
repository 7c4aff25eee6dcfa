//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::{EventRepository, RegistrationRepository, UserRepository};

use super::event_repository::SeaOrmEventRepository;
use super::registration_repository::SeaOrmRegistrationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    events: SeaOrmEventRepository,
    registrations: SeaOrmRegistrationRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            events: SeaOrmEventRepository::new(db.clone()),
            registrations: SeaOrmRegistrationRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn events(&self) -> &dyn EventRepository {
        &self.events
    }

    fn registrations(&self) -> &dyn RegistrationRepository {
        &self.registrations
    }
}
