//! In-memory repository fakes for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    DomainError, DomainResult, Event, EventRepository, EventSearch, Registration,
    RegistrationRepository, RegistrationStatus, RepositoryProvider, Role, User, UserRepository,
};

// ── Users ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryUserRepository {
    rows: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn save(&self, user: User) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let duplicate = rows
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if duplicate {
            return Err(DomainError::Conflict(
                "Username or email already exists".into(),
            ));
        }
        rows.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, user: User) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&user.id) {
            return Err(DomainError::not_found("User", "id", user.id));
        }
        rows.insert(user.id.clone(), user);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        if self.rows.lock().unwrap().remove(id).is_none() {
            return Err(DomainError::not_found("User", "id", id));
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

// ── Events ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryEventRepository {
    rows: Mutex<HashMap<String, Event>>,
    /// When set, the next `claim_version` fails as if a concurrent writer
    /// bumped the token between check and commit.
    poison_claim: AtomicBool,
}

impl MemoryEventRepository {
    pub fn poison_next_claim(&self) {
        self.poison_claim.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn save(&self, event: Event) -> DomainResult<()> {
        self.rows.lock().unwrap().insert(event.id.clone(), event);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Event>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn find_published(&self) -> DomainResult<Vec<Event>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.published)
            .cloned()
            .collect())
    }

    async fn find_by_organizer(&self, organizer_id: &str) -> DomainResult<Vec<Event>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect())
    }

    async fn search(&self, filter: &EventSearch) -> DomainResult<Vec<Event>> {
        let rows = self.rows.lock().unwrap();
        let keyword = filter.keyword.as_ref().map(|k| k.to_lowercase());
        Ok(rows
            .values()
            .filter(|e| e.published)
            .filter(|e| match &keyword {
                Some(k) => {
                    e.name.to_lowercase().contains(k)
                        || e.description
                            .as_ref()
                            .map(|d| d.to_lowercase().contains(k))
                            .unwrap_or(false)
                }
                None => true,
            })
            .filter(|e| match &filter.category {
                Some(c) => e.category.as_deref() == Some(c.as_str()),
                None => true,
            })
            .filter(|e| match filter.date {
                Some(d) => e.start_time.date_naive() == d,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn update(&self, event: Event) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&event.id) {
            return Err(DomainError::not_found("Event", "id", event.id));
        }
        rows.insert(event.id.clone(), event);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        if self.rows.lock().unwrap().remove(id).is_none() {
            return Err(DomainError::not_found("Event", "id", id));
        }
        Ok(())
    }

    async fn claim_version(&self, id: &str, expected_version: i64) -> DomainResult<bool> {
        if self.poison_claim.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(id) {
            Some(event) if event.version == expected_version => {
                event.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ── Registrations ──────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryRegistrationRepository {
    rows: Mutex<HashMap<String, Registration>>,
}

#[async_trait]
impl RegistrationRepository for MemoryRegistrationRepository {
    async fn save(&self, registration: Registration) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let duplicate = rows.values().any(|r| {
            r.user_id == registration.user_id && r.event_id == registration.event_id
        });
        if duplicate {
            return Err(DomainError::Conflict(
                "User is already registered for this event".into(),
            ));
        }
        rows.insert(registration.id.clone(), registration);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Registration>> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Registration>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Registration>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_event(&self, event_id: &str) -> DomainResult<Vec<Registration>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> DomainResult<Option<Registration>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|r| r.user_id == user_id && r.event_id == event_id)
            .cloned())
    }

    async fn count_confirmed_for_event(&self, event_id: &str) -> DomainResult<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.event_id == event_id && r.status == RegistrationStatus::Confirmed)
            .count() as u64)
    }

    async fn update(&self, registration: Registration) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&registration.id) {
            return Err(DomainError::not_found("Registration", "id", registration.id));
        }
        rows.insert(registration.id.clone(), registration);
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        if self.rows.lock().unwrap().remove(id).is_none() {
            return Err(DomainError::not_found("Registration", "id", id));
        }
        Ok(())
    }
}

// ── Provider ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryRepositoryProvider {
    pub user_repo: MemoryUserRepository,
    pub event_repo: MemoryEventRepository,
    pub registration_repo: MemoryRegistrationRepository,
}

impl RepositoryProvider for MemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.user_repo
    }

    fn events(&self) -> &dyn EventRepository {
        &self.event_repo
    }

    fn registrations(&self) -> &dyn RegistrationRepository {
        &self.registration_repo
    }
}

// ── Fixtures ───────────────────────────────────────────────────

pub fn fixture_user(id: &str, username: &str, roles: Vec<Role>) -> User {
    User {
        id: id.into(),
        username: username.into(),
        email: format!("{}@example.com", username),
        password_hash: "$2b$12$fixture-hash".into(),
        full_name: format!("{} Fixture", username),
        roles,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn fixture_event(
    id: &str,
    organizer_id: &str,
    capacity: i32,
    published: bool,
    start_time: DateTime<Utc>,
) -> Event {
    Event {
        id: id.into(),
        name: format!("Event {}", id),
        description: Some("A fixture event".into()),
        start_time,
        end_time: start_time + Duration::hours(2),
        location: Some("Main Hall".into()),
        category: Some("General".into()),
        capacity,
        published,
        version: 0,
        organizer_id: organizer_id.into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
