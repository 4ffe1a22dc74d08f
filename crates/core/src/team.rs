// Team domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum TeamRole {
    Leader,
    Member,
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRole::Leader => write!(f, "LEADER"),
            TeamRole::Member => write!(f, "MEMBER"),
        }
    }
}

impl From<&str> for TeamRole {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "LEADER" => TeamRole::Leader,
            _ => TeamRole::Member,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub team_id: i64,
    pub user_id: i64,
    pub role: TeamRole,
    pub created_at: DateTime<Utc>,
}
