//! Registration repository interface

use async_trait::async_trait;

use super::model::Registration;
use crate::domain::DomainResult;

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Persist a new registration
    async fn save(&self, registration: Registration) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Registration>>;

    async fn find_all(&self) -> DomainResult<Vec<Registration>>;

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Registration>>;

    async fn find_by_event(&self, event_id: &str) -> DomainResult<Vec<Registration>>;

    /// The (user, event) pair's row regardless of status
    async fn find_by_user_and_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> DomainResult<Option<Registration>>;

    /// Number of CONFIRMED registrations held against the event's capacity
    async fn count_confirmed_for_event(&self, event_id: &str) -> DomainResult<u64>;

    /// Update status/timestamp of an existing registration
    async fn update(&self, registration: Registration) -> DomainResult<()>;

    /// Hard delete by id, `NotFound` when no row matches
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
