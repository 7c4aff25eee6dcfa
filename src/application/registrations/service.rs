//! Registration lifecycle service
//!
//! Every state change to a registration goes through here. The service
//! enforces, in order: referential existence, the published gate, the
//! one-registration-per-(user, event) rule, the capacity bound, and the
//! start-time window. Capacity accounting counts CONFIRMED rows only, so a
//! cancelled registration frees its spot and may be reactivated later.
//!
//! Overbooking under concurrent requests is prevented with the event's
//! optimistic version token: after the checks pass, the token is claimed
//! conditionally and a lost claim fails the request with a conflict. The
//! caller retries; the service never does.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Registration, RepositoryProvider};
use crate::shared::Clock;

pub struct RegistrationService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl RegistrationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Register a user for an event.
    ///
    /// Precondition order is part of the contract: the first failing check
    /// determines the error the caller sees.
    pub async fn register(&self, user_id: &str, event_id: &str) -> DomainResult<Registration> {
        let user = self
            .repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        let event = self
            .repos
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Event", "id", event_id))?;

        if !event.published {
            return Err(DomainError::InvalidState(
                "Cannot register for an unpublished event".into(),
            ));
        }

        let existing = self
            .repos
            .registrations()
            .find_by_user_and_event(user_id, event_id)
            .await?;

        if let Some(ref registration) = existing {
            if registration.is_confirmed() {
                return Err(DomainError::Conflict(
                    "User is already registered for this event".into(),
                ));
            }
            // A cancelled row does not block; it is reactivated below.
        }

        let confirmed = self
            .repos
            .registrations()
            .count_confirmed_for_event(event_id)
            .await?;
        if !event.has_available_spots(confirmed) {
            return Err(DomainError::InvalidState("Event is at full capacity".into()));
        }

        let now = self.clock.now();
        if !event.is_upcoming(now) {
            return Err(DomainError::InvalidState(
                "Cannot register for past events".into(),
            ));
        }

        // Claim the capacity slot. A failed claim means another writer
        // touched the event between our checks and this write.
        if !self
            .repos
            .events()
            .claim_version(&event.id, event.version)
            .await?
        {
            return Err(DomainError::Conflict(
                "Event was modified concurrently, please retry".into(),
            ));
        }

        let registration = match existing {
            Some(mut registration) => {
                registration.reactivate(now);
                self.repos
                    .registrations()
                    .update(registration.clone())
                    .await?;
                registration
            }
            None => {
                let registration =
                    Registration::new(Uuid::new_v4().to_string(), user.id, event.id, now);
                self.repos
                    .registrations()
                    .save(registration.clone())
                    .await?;
                registration
            }
        };

        info!(
            registration_id = %registration.id,
            user_id = %registration.user_id,
            event_id = %registration.event_id,
            "Registration confirmed"
        );
        Ok(registration)
    }

    /// Cancel a registration. The row is kept with CANCELLED status.
    pub async fn cancel(&self, user_id: &str, event_id: &str) -> DomainResult<Registration> {
        let mut registration = self
            .repos
            .registrations()
            .find_by_user_and_event(user_id, event_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    "Registration",
                    "user and event",
                    format!("{}, {}", user_id, event_id),
                )
            })?;

        let event = self
            .repos
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Event", "id", event_id))?;

        if !event.is_upcoming(self.clock.now()) {
            return Err(DomainError::InvalidState(
                "Cannot cancel registration for events that have already started".into(),
            ));
        }

        registration.cancel();
        self.repos
            .registrations()
            .update(registration.clone())
            .await?;

        info!(
            registration_id = %registration.id,
            user_id = %registration.user_id,
            event_id = %registration.event_id,
            "Registration cancelled"
        );
        Ok(registration)
    }

    /// Permanently remove a registration row.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.registrations().delete(id).await?;
        info!(registration_id = %id, "Registration deleted");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_all(&self) -> DomainResult<Vec<Registration>> {
        self.repos.registrations().find_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> DomainResult<Registration> {
        self.repos
            .registrations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Registration", "id", id))
    }

    /// Registrations made by one user. The user must exist; callers never
    /// get an empty list for a dangling id.
    pub async fn list_by_user(&self, user_id: &str) -> DomainResult<Vec<Registration>> {
        if self.repos.users().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User", "id", user_id));
        }
        self.repos.registrations().find_by_user(user_id).await
    }

    /// Registrations held against one event. The event must exist.
    pub async fn list_by_event(&self, event_id: &str) -> DomainResult<Vec<Registration>> {
        if self.repos.events().find_by_id(event_id).await?.is_none() {
            return Err(DomainError::not_found("Event", "id", event_id));
        }
        self.repos.registrations().find_by_event(event_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{fixture_event, fixture_user, MemoryRepositoryProvider};
    use crate::domain::{RegistrationStatus, Role};
    use crate::shared::clock::FixedClock;
    use chrono::{Duration, Utc};

    struct Harness {
        repos: Arc<MemoryRepositoryProvider>,
        clock: Arc<FixedClock>,
        service: RegistrationService,
    }

    /// One published event (capacity as given) starting in 7 days, with
    /// users u-1..u-n seeded.
    async fn harness(capacity: i32, users: usize) -> Harness {
        let repos = Arc::new(MemoryRepositoryProvider::default());
        let clock = Arc::new(FixedClock::at(Utc::now()));

        repos
            .users()
            .save(fixture_user("org-1", "organizer", vec![Role::Organizer]))
            .await
            .unwrap();
        for i in 1..=users {
            repos
                .users()
                .save(fixture_user(
                    &format!("u-{}", i),
                    &format!("user{}", i),
                    vec![Role::User],
                ))
                .await
                .unwrap();
        }

        let start = clock.now() + Duration::days(7);
        repos
            .events()
            .save(fixture_event("ev-1", "org-1", capacity, true, start))
            .await
            .unwrap();

        let service = RegistrationService::new(repos.clone(), clock.clone());
        Harness {
            repos,
            clock,
            service,
        }
    }

    #[tokio::test]
    async fn register_confirms_and_persists() {
        let h = harness(5, 1).await;
        let registration = h.service.register("u-1", "ev-1").await.unwrap();

        assert_eq!(registration.status, RegistrationStatus::Confirmed);
        assert_eq!(registration.registered_at, h.clock.now());

        let stored = h
            .repos
            .registrations()
            .find_by_user_and_event("u-1", "ev-1")
            .await
            .unwrap()
            .expect("row must exist");
        assert!(stored.is_confirmed());
    }

    #[tokio::test]
    async fn register_unknown_user_is_not_found() {
        let h = harness(5, 0).await;
        let err = h.service.register("ghost", "ev-1").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "User", .. }
        ));
        assert!(h.repos.registrations().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn register_unknown_event_is_not_found() {
        let h = harness(5, 1).await;
        let err = h.service.register("u-1", "ghost").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Event", .. }
        ));
    }

    #[tokio::test]
    async fn unpublished_event_rejects_registration() {
        let h = harness(5, 1).await;
        let start = h.clock.now() + Duration::days(7);
        h.repos
            .events()
            .save(fixture_event("ev-draft", "org-1", 5, false, start))
            .await
            .unwrap();

        let err = h.service.register("u-1", "ev-draft").await.unwrap_err();
        match err {
            DomainError::InvalidState(msg) => {
                assert_eq!(msg, "Cannot register for an unpublished event")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(h.repos.registrations().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let h = harness(5, 2).await;
        h.service.register("u-1", "ev-1").await.unwrap();
        h.service.register("u-2", "ev-1").await.unwrap();

        let err = h.service.register("u-1", "ev-1").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn capacity_is_enforced_exactly() {
        let capacity = 3;
        let h = harness(capacity, 4).await;

        for i in 1..=capacity {
            h.service
                .register(&format!("u-{}", i), "ev-1")
                .await
                .unwrap();
        }

        let err = h.service.register("u-4", "ev-1").await.unwrap_err();
        match err {
            DomainError::InvalidState(msg) => assert_eq!(msg, "Event is at full capacity"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            h.repos
                .registrations()
                .count_confirmed_for_event("ev-1")
                .await
                .unwrap(),
            capacity as u64
        );
    }

    #[tokio::test]
    async fn past_event_rejects_registration() {
        let h = harness(5, 1).await;
        // Move "now" past the event start
        h.clock.set(h.clock.now() + Duration::days(8));

        let err = h.service.register("u-1", "ev-1").await.unwrap_err();
        match err {
            DomainError::InvalidState(msg) => assert_eq!(msg, "Cannot register for past events"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn precondition_order_reports_publish_state_before_duplicate() {
        let h = harness(5, 1).await;
        h.service.register("u-1", "ev-1").await.unwrap();

        // Unpublish behind the service's back, then re-register: the
        // published gate is checked before the duplicate check.
        let mut event = h.repos.events().find_by_id("ev-1").await.unwrap().unwrap();
        event.published = false;
        h.repos.events().update(event).await.unwrap();

        let err = h.service.register("u-1", "ev-1").await.unwrap_err();
        match err {
            DomainError::InvalidState(msg) => {
                assert_eq!(msg, "Cannot register for an unpublished event")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn lost_version_claim_conflicts_and_writes_nothing() {
        let h = harness(1, 1).await;
        h.repos.event_repo.poison_next_claim();

        let err = h.service.register("u-1", "ev-1").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(h.repos.registrations().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_sets_cancelled_and_keeps_the_row() {
        let h = harness(5, 1).await;
        h.service.register("u-1", "ev-1").await.unwrap();

        let cancelled = h.service.cancel("u-1", "ev-1").await.unwrap();
        assert_eq!(cancelled.status, RegistrationStatus::Cancelled);

        let stored = h
            .repos
            .registrations()
            .find_by_user_and_event("u-1", "ev-1")
            .await
            .unwrap()
            .expect("cancelled row is retained");
        assert_eq!(stored.status, RegistrationStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_without_registration_is_not_found() {
        let h = harness(5, 1).await;
        let err = h.service.cancel("u-1", "ev-1").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: "Registration",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn cancel_after_event_start_is_rejected_and_status_unchanged() {
        let h = harness(5, 1).await;
        h.service.register("u-1", "ev-1").await.unwrap();

        h.clock.set(h.clock.now() + Duration::days(8));
        let err = h.service.cancel("u-1", "ev-1").await.unwrap_err();
        match err {
            DomainError::InvalidState(msg) => assert_eq!(
                msg,
                "Cannot cancel registration for events that have already started"
            ),
            other => panic!("unexpected error: {:?}", other),
        }

        let stored = h
            .repos
            .registrations()
            .find_by_user_and_event("u-1", "ev-1")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_confirmed());
    }

    /// The pinned capacity=1 scenario: cancelled rows neither consume
    /// capacity nor block the freed spot.
    #[tokio::test]
    async fn cancelling_frees_the_spot_for_another_user() {
        let h = harness(1, 2).await;

        h.service.register("u-1", "ev-1").await.unwrap();

        let err = h.service.register("u-2", "ev-1").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        h.service.cancel("u-1", "ev-1").await.unwrap();

        // The freed spot is available again
        let second = h.service.register("u-2", "ev-1").await.unwrap();
        assert!(second.is_confirmed());
    }

    #[tokio::test]
    async fn reregistering_after_cancel_reactivates_the_same_row() {
        let h = harness(2, 1).await;

        let first = h.service.register("u-1", "ev-1").await.unwrap();
        h.service.cancel("u-1", "ev-1").await.unwrap();

        h.clock.set(h.clock.now() + Duration::days(1));
        let second = h.service.register("u-1", "ev-1").await.unwrap();

        // Same row, fresh timestamp, one row per (user, event)
        assert_eq!(second.id, first.id);
        assert!(second.registered_at > first.registered_at);
        assert_eq!(h.repos.registrations().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_row_permanently() {
        let h = harness(5, 1).await;
        let registration = h.service.register("u-1", "ev-1").await.unwrap();

        h.service.delete(&registration.id).await.unwrap();
        assert!(h
            .repos
            .registrations()
            .find_by_id(&registration.id)
            .await
            .unwrap()
            .is_none());

        let err = h.service.delete(&registration.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn get_by_id_unknown_is_not_found() {
        let h = harness(5, 0).await;
        let err = h.service.get_by_id("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_by_user_validates_the_user_exists() {
        let h = harness(5, 1).await;
        let err = h.service.list_by_user("ghost").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "User", .. }
        ));

        h.service.register("u-1", "ev-1").await.unwrap();
        let rows = h.service.list_by_user("u-1").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn list_by_event_validates_the_event_exists() {
        let h = harness(5, 1).await;
        let err = h.service.list_by_event("ghost").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Event", .. }
        ));

        h.service.register("u-1", "ev-1").await.unwrap();
        let rows = h.service.list_by_event("ev-1").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn version_token_advances_with_each_registration() {
        let h = harness(3, 2).await;

        h.service.register("u-1", "ev-1").await.unwrap();
        let event = h.repos.events().find_by_id("ev-1").await.unwrap().unwrap();
        assert_eq!(event.version, 1);

        h.service.register("u-2", "ev-1").await.unwrap();
        let event = h.repos.events().find_by_id("ev-1").await.unwrap().unwrap();
        assert_eq!(event.version, 2);
    }
}
