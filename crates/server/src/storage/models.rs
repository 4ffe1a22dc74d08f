// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use teamcal_core::SortOrder;

// ============================================
// Users
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub employee_number: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub employee_number: String,
    pub name: String,
    pub role: String,
    pub status: String,
}

// ============================================
// Teams
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub team_id: i64,
    pub user_id: i64,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateTeamMemberRow {
    pub team_id: i64,
    pub user_id: i64,
    pub role: String,
}

// ============================================
// Events
// ============================================

/// Calendar event row. `start_time`/`end_time` are legacy columns.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub team_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEventRow {
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub user_id: i64,
    pub team_id: i64,
}

/// Partial update. Writing a date clears the matching legacy time column.
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// List filter. `None` fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub team_ids: Option<Vec<i64>>,
    /// Keep events ending at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Keep events starting at or before this instant
    pub to: Option<DateTime<Utc>>,
}

// ============================================
// Game scores
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct GameScoreRow {
    pub id: i64,
    pub user_id: i64,
    pub game_type: String,
    pub score: f64,
    pub metadata: Option<sqlx::types::JsonValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Score row joined with the owner's name, for ranking queries
#[derive(Debug, Clone, FromRow)]
pub struct RankedScoreRow {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub score: f64,
    pub metadata: Option<sqlx::types::JsonValue>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SubmitScoreRow {
    pub user_id: i64,
    pub game_type: String,
    pub score: f64,
    pub metadata: Option<sqlx::types::JsonValue>,
    pub order: SortOrder,
}

/// Result of a conditional best-score write
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The stored best after the write
    pub row: GameScoreRow,
    /// Whether this submission was written
    pub improved: bool,
}
