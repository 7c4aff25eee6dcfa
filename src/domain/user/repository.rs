//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    async fn save(&self, user: User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn find_all(&self) -> DomainResult<Vec<User>>;

    /// Update every mutable field of an existing user
    async fn update(&self, user: User) -> DomainResult<()>;

    /// Delete by id, `NotFound` when no row matches
    async fn delete(&self, id: &str) -> DomainResult<()>;

    async fn count(&self) -> DomainResult<u64>;
}
