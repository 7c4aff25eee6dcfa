//! Event repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::Event;
use crate::domain::DomainResult;

/// Search filters for published events. Empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct EventSearch {
    /// Case-insensitive substring of name or description
    pub keyword: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Calendar date of the start time
    pub date: Option<NaiveDate>,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event
    async fn save(&self, event: Event) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>>;

    async fn find_all(&self) -> DomainResult<Vec<Event>>;

    async fn find_published(&self) -> DomainResult<Vec<Event>>;

    async fn find_by_organizer(&self, organizer_id: &str) -> DomainResult<Vec<Event>>;

    /// Published events matching all given filters
    async fn search(&self, filter: &EventSearch) -> DomainResult<Vec<Event>>;

    /// Update every mutable field of an existing event
    async fn update(&self, event: Event) -> DomainResult<()>;

    /// Delete by id, `NotFound` when no row matches
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Conditionally bump the optimistic version token.
    ///
    /// Returns `false` when the row's version no longer equals
    /// `expected_version`, i.e. a concurrent writer got there first.
    async fn claim_version(&self, id: &str, expected_version: i64) -> DomainResult<bool>;
}
