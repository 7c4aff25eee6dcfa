//! Registration domain entity

use chrono::{DateTime, Utc};

/// Registration status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// Holds a spot against the event's capacity
    Confirmed,
    /// Released its spot; the row is kept for history
    Cancelled,
    /// Reserved in the data model, never produced by current logic
    Waitlisted,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Waitlisted => "WAITLISTED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "CONFIRMED" => Self::Confirmed,
            "WAITLISTED" => Self::Waitlisted,
            _ => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Link between a user and an event. At most one row per (user, event) pair.
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        event_id: impl Into<String>,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            event_id: event_id.into(),
            status: RegistrationStatus::Confirmed,
            registered_at,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == RegistrationStatus::Confirmed
    }

    /// Soft state change; the row survives for history.
    pub fn cancel(&mut self) {
        self.status = RegistrationStatus::Cancelled;
    }

    /// Re-confirm a previously cancelled registration.
    pub fn reactivate(&mut self, registered_at: DateTime<Utc>) {
        self.status = RegistrationStatus::Confirmed;
        self.registered_at = registered_at;
    }
}

// ── Tests ──────────────────────────────────────────────────────
