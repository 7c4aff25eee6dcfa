//! Event DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::EventDetails;

/// Event API representation, including spot accounting
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub capacity: i32,
    pub published: bool,
    pub organizer_id: String,
    /// Confirmed registrations held against capacity
    pub registration_count: u64,
    pub available_spots: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventDetails> for EventDto {
    fn from(d: EventDetails) -> Self {
        let available_spots = d.available_spots();
        let e = d.event;
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            start_time: e.start_time,
            end_time: e.end_time,
            location: e.location,
            category: e.category,
            capacity: e.capacity,
            published: e.published,
            organizer_id: e.organizer_id,
            registration_count: d.registration_count,
            available_spots,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Create event request. Events always start unpublished.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: i32,
    pub organizer_id: String,
}

/// Update event request. Organizer and published flag are not updatable.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub capacity: i32,
}

/// List query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListEventsParams {
    /// When true, only published events are returned
    #[serde(default)]
    pub published_only: bool,
}

/// Search query parameters. All filters are optional and combined with AND.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchEventsParams {
    /// Case-insensitive substring of name or description
    pub keyword: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Calendar date (YYYY-MM-DD) of the start time
    pub date: Option<NaiveDate>,
}
