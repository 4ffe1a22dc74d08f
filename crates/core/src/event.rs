// Calendar event domain types
//
// These types represent a scheduled team event and its category.
// Used by both API and storage layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Calendar entry category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Vacation,
    Meeting,
    Training,
    BusinessTrip,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Vacation,
        EventType::Meeting,
        EventType::Training,
        EventType::BusinessTrip,
        EventType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Vacation => "VACATION",
            EventType::Meeting => "MEETING",
            EventType::Training => "TRAINING",
            EventType::BusinessTrip => "BUSINESS_TRIP",
            EventType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("eventType must be one of VACATION, MEETING, TRAINING, BUSINESS_TRIP, OTHER (got '{0}')")]
pub struct ParseEventTypeError(pub String);

impl std::str::FromStr for EventType {
    type Err = ParseEventTypeError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ParseEventTypeError(s.to_string()))
    }
}

/// A team calendar event.
///
/// `start`/`end` are the reconciled instants. `startDate`/`endDate` are the raw
/// stored columns, kept so edit forms can show the inclusive values while the
/// calendar view receives an exclusive `end`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub event_type: EventType,
    /// Reconciled start instant.
    pub start: DateTime<Utc>,
    /// Reconciled end instant. Exclusive (next local midnight) in list responses.
    pub end: DateTime<Utc>,
    /// Stored start date column.
    pub start_date: Option<DateTime<Utc>>,
    /// Stored end date column.
    pub end_date: Option<DateTime<Utc>>,
    /// Owner.
    pub user_id: i64,
    pub team_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
