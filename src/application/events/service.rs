//! Event management service
//!
//! Owns the temporal/referential validation on create and update, the
//! publish/unpublish idempotence guard, and the read-side spot accounting.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Event, EventSearch, RepositoryProvider};
use crate::shared::Clock;

/// Event enriched with its confirmed-registration count.
#[derive(Debug, Clone)]
pub struct EventDetails {
    pub event: Event,
    pub registration_count: u64,
}

impl EventDetails {
    pub fn available_spots(&self) -> i64 {
        self.event.available_spots(self.registration_count)
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub capacity: i32,
    pub organizer_id: String,
}

/// Update payload. The organizer and the published flag are not updatable
/// through this path: ownership is immutable and publication is an explicit
/// separate action.
#[derive(Debug, Clone)]
pub struct UpdateEvent {
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub capacity: i32,
}

pub struct EventService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Create an event. Always starts unpublished, whatever the caller sent.
    pub async fn create(&self, input: CreateEvent) -> DomainResult<EventDetails> {
        self.validate_dates(input.start_time, input.end_time)?;

        let organizer = self
            .repos
            .users()
            .find_by_id(&input.organizer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", input.organizer_id.clone()))?;

        let now = self.clock.now();
        let event = Event {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            start_time: input.start_time,
            end_time: input.end_time,
            location: input.location,
            category: input.category,
            capacity: input.capacity,
            published: false, // publishing is an explicit, later action
            version: 0,
            organizer_id: organizer.id,
            created_at: now,
            updated_at: now,
        };

        self.repos.events().save(event.clone()).await?;
        info!(event_id = %event.id, name = %event.name, "Event created");

        Ok(EventDetails {
            event,
            registration_count: 0,
        })
    }

    pub async fn update(&self, id: &str, input: UpdateEvent) -> DomainResult<EventDetails> {
        self.validate_dates(input.start_time, input.end_time)?;

        let mut event = self.get_event(id).await?;

        event.name = input.name;
        event.description = input.description;
        event.start_time = input.start_time;
        event.end_time = input.end_time;
        event.location = input.location;
        event.category = input.category;
        event.capacity = input.capacity;
        event.updated_at = self.clock.now();

        self.repos.events().update(event.clone()).await?;
        info!(event_id = %event.id, "Event updated");

        self.with_count(event).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.events().delete(id).await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// Set published. Registrations are untouched either way: only new
    /// registration creation is gated on the flag.
    pub async fn publish(&self, id: &str) -> DomainResult<EventDetails> {
        let mut event = self.get_event(id).await?;

        if event.published {
            return Err(DomainError::InvalidState(
                "Event is already published".into(),
            ));
        }

        event.published = true;
        event.updated_at = self.clock.now();
        self.repos.events().update(event.clone()).await?;
        info!(event_id = %event.id, "Event published");

        self.with_count(event).await
    }

    pub async fn unpublish(&self, id: &str) -> DomainResult<EventDetails> {
        let mut event = self.get_event(id).await?;

        if !event.published {
            return Err(DomainError::InvalidState(
                "Event is already unpublished".into(),
            ));
        }

        event.published = false;
        event.updated_at = self.clock.now();
        self.repos.events().update(event.clone()).await?;
        info!(event_id = %event.id, "Event unpublished");

        self.with_count(event).await
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get(&self, id: &str) -> DomainResult<EventDetails> {
        let event = self.get_event(id).await?;
        self.with_count(event).await
    }

    pub async fn list_all(&self) -> DomainResult<Vec<EventDetails>> {
        let events = self.repos.events().find_all().await?;
        self.with_counts(events).await
    }

    pub async fn list_published(&self) -> DomainResult<Vec<EventDetails>> {
        let events = self.repos.events().find_published().await?;
        self.with_counts(events).await
    }

    pub async fn list_by_organizer(&self, organizer_id: &str) -> DomainResult<Vec<EventDetails>> {
        if self
            .repos
            .users()
            .find_by_id(organizer_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("User", "id", organizer_id));
        }

        let events = self.repos.events().find_by_organizer(organizer_id).await?;
        self.with_counts(events).await
    }

    pub async fn search(&self, filter: EventSearch) -> DomainResult<Vec<EventDetails>> {
        let events = self.repos.events().search(&filter).await?;
        self.with_counts(events).await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn get_event(&self, id: &str) -> DomainResult<Event> {
        self.repos
            .events()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Event", "id", id))
    }

    async fn with_count(&self, event: Event) -> DomainResult<EventDetails> {
        let registration_count = self
            .repos
            .registrations()
            .count_confirmed_for_event(&event.id)
            .await?;
        Ok(EventDetails {
            event,
            registration_count,
        })
    }

    async fn with_counts(&self, events: Vec<Event>) -> DomainResult<Vec<EventDetails>> {
        let mut details = Vec::with_capacity(events.len());
        for event in events {
            details.push(self.with_count(event).await?);
        }
        Ok(details)
    }

    fn validate_dates(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
        let now = self.clock.now();
        if start <= now {
            return Err(DomainError::InvalidState(
                "Event start time must be in the future".into(),
            ));
        }
        if end < start {
            return Err(DomainError::InvalidState(
                "Event end time must be after start time".into(),
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{fixture_event, fixture_user, MemoryRepositoryProvider};
    use crate::domain::{Registration, Role};
    use crate::shared::clock::FixedClock;
    use chrono::Duration;

    fn setup() -> (
        Arc<MemoryRepositoryProvider>,
        Arc<FixedClock>,
        EventService,
    ) {
        let repos = Arc::new(MemoryRepositoryProvider::default());
        let clock = Arc::new(FixedClock::at(Utc::now()));
        let svc = EventService::new(repos.clone(), clock.clone());
        (repos, clock, svc)
    }

    fn create_input(organizer_id: &str, start: DateTime<Utc>) -> CreateEvent {
        CreateEvent {
            name: "Open Mic Night".into(),
            description: Some("Bring your own instrument".into()),
            start_time: start,
            end_time: start + Duration::hours(3),
            location: Some("Basement Club".into()),
            category: Some("Music".into()),
            capacity: 40,
            organizer_id: organizer_id.into(),
        }
    }

    async fn seed_organizer(repos: &MemoryRepositoryProvider) {
        repos
            .users()
            .save(fixture_user("org-1", "organizer", vec![Role::Organizer]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_starts_unpublished() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;

        let details = svc
            .create(create_input("org-1", clock.now() + Duration::days(10)))
            .await
            .unwrap();

        assert!(!details.event.published);
        assert_eq!(details.registration_count, 0);
        assert_eq!(details.available_spots(), 40);
    }

    #[tokio::test]
    async fn create_rejects_past_start_and_persists_nothing() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;

        let err = svc
            .create(create_input("org-1", clock.now() - Duration::days(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert!(repos.events().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_end_before_start() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;

        let start = clock.now() + Duration::days(10);
        let mut input = create_input("org-1", start);
        input.end_time = start - Duration::hours(1);

        let err = svc.create(input).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert!(repos.events().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_allows_zero_length_event() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;

        let start = clock.now() + Duration::days(10);
        let mut input = create_input("org-1", start);
        input.end_time = start;

        assert!(svc.create(input).await.is_ok());
    }

    #[tokio::test]
    async fn create_requires_existing_organizer() {
        let (_, clock, svc) = setup();
        let err = svc
            .create(create_input("ghost", clock.now() + Duration::days(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_revalidates_dates() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;
        let details = svc
            .create(create_input("org-1", clock.now() + Duration::days(10)))
            .await
            .unwrap();

        let err = svc
            .update(
                &details.event.id,
                UpdateEvent {
                    name: "Renamed".into(),
                    description: None,
                    start_time: clock.now() - Duration::days(1),
                    end_time: clock.now() + Duration::days(1),
                    location: None,
                    category: None,
                    capacity: 10,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn update_does_not_touch_published_or_organizer() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;
        let details = svc
            .create(create_input("org-1", clock.now() + Duration::days(10)))
            .await
            .unwrap();
        svc.publish(&details.event.id).await.unwrap();

        let start = clock.now() + Duration::days(20);
        let updated = svc
            .update(
                &details.event.id,
                UpdateEvent {
                    name: "Renamed".into(),
                    description: None,
                    start_time: start,
                    end_time: start + Duration::hours(1),
                    location: None,
                    category: None,
                    capacity: 15,
                },
            )
            .await
            .unwrap();

        assert!(updated.event.published);
        assert_eq!(updated.event.organizer_id, "org-1");
        assert_eq!(updated.event.name, "Renamed");
        assert_eq!(updated.event.capacity, 15);
    }

    #[tokio::test]
    async fn publish_twice_hits_the_guard() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;
        let details = svc
            .create(create_input("org-1", clock.now() + Duration::days(10)))
            .await
            .unwrap();

        assert!(svc.publish(&details.event.id).await.is_ok());
        let err = svc.publish(&details.event.id).await.unwrap_err();
        match err {
            DomainError::InvalidState(msg) => assert_eq!(msg, "Event is already published"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unpublish_twice_hits_the_guard() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;
        let details = svc
            .create(create_input("org-1", clock.now() + Duration::days(10)))
            .await
            .unwrap();

        // New events are unpublished, so the very first unpublish is guarded
        let err = svc.unpublish(&details.event.id).await.unwrap_err();
        match err {
            DomainError::InvalidState(msg) => assert_eq!(msg, "Event is already unpublished"),
            other => panic!("unexpected error: {:?}", other),
        }

        svc.publish(&details.event.id).await.unwrap();
        assert!(svc.unpublish(&details.event.id).await.is_ok());
        assert!(svc.unpublish(&details.event.id).await.is_err());
    }

    #[tokio::test]
    async fn unpublish_leaves_registrations_alone() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;
        repos
            .users()
            .save(fixture_user("u-1", "attendee", vec![Role::User]))
            .await
            .unwrap();

        let details = svc
            .create(create_input("org-1", clock.now() + Duration::days(10)))
            .await
            .unwrap();
        svc.publish(&details.event.id).await.unwrap();

        let registration =
            Registration::new("r-1", "u-1", details.event.id.clone(), clock.now());
        repos.registrations().save(registration).await.unwrap();

        svc.unpublish(&details.event.id).await.unwrap();

        let kept = repos
            .registrations()
            .find_by_user_and_event("u-1", &details.event.id)
            .await
            .unwrap()
            .expect("registration must survive unpublish");
        assert!(kept.is_confirmed());
    }

    #[tokio::test]
    async fn search_filters_by_keyword_category_and_date() {
        let (repos, clock, svc) = setup();
        seed_organizer(&repos).await;

        let start = clock.now() + Duration::days(5);
        let mut rock = fixture_event("ev-rock", "org-1", 100, true, start);
        rock.name = "Rock Night".into();
        rock.category = Some("Music".into());
        let mut talk = fixture_event("ev-talk", "org-1", 100, true, start + Duration::days(1));
        talk.name = "Tech Talk".into();
        talk.category = Some("Tech".into());
        let mut draft = fixture_event("ev-draft", "org-1", 100, false, start);
        draft.name = "Rock Rehearsal".into();

        for e in [rock, talk, draft] {
            repos.events().save(e).await.unwrap();
        }

        // Keyword is case-insensitive and skips unpublished events
        let hits = svc
            .search(EventSearch {
                keyword: Some("rock".into()),
                ..EventSearch::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event.id, "ev-rock");

        let hits = svc
            .search(EventSearch {
                category: Some("Tech".into()),
                ..EventSearch::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event.id, "ev-talk");

        let hits = svc
            .search(EventSearch {
                date: Some((start + Duration::days(1)).date_naive()),
                ..EventSearch::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].event.id, "ev-talk");
    }

    #[tokio::test]
    async fn list_by_organizer_requires_existing_user() {
        let (_, _, svc) = setup();
        let err = svc.list_by_organizer("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_unknown_event_is_not_found() {
        let (_, _, svc) = setup();
        let err = svc.delete("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

}
