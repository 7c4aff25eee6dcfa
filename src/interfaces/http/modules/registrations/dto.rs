//! Registration DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Registration;

/// Registration API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationDto {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    /// CONFIRMED, CANCELLED or WAITLISTED
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationDto {
    fn from(r: Registration) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            event_id: r.event_id,
            status: r.status.as_str().to_string(),
            registered_at: r.registered_at,
        }
    }
}
