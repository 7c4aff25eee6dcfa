//! Event domain entity

use chrono::{DateTime, Utc};

/// Scheduled event owned by an organizer.
///
/// `version` is an optimistic-concurrency token: every capacity-relevant
/// write claims it conditionally, so two concurrent registrations for the
/// last open spot cannot both pass the capacity check and commit.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub capacity: i32,
    pub published: bool,
    pub version: i64,
    /// Owning organizer, immutable after creation
    pub organizer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Spots left given the number of confirmed registrations.
    pub fn available_spots(&self, confirmed_count: u64) -> i64 {
        self.capacity as i64 - confirmed_count as i64
    }

    pub fn has_available_spots(&self, confirmed_count: u64) -> bool {
        self.available_spots(confirmed_count) > 0
    }

    /// Whether the event has not yet started at `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }
}

// ── Tests ──────────────────────────────────────────────────────
