// Team service: team lookup and membership administration

use crate::auth::AuthUser;
use crate::storage::{CreateTeamMemberRow, StorageBackend, TeamMemberRow, TeamRow};
use std::sync::Arc;
use teamcal_core::{Team, TeamMember, TeamRole};

use super::error::{ServiceError, ServiceResult};

pub struct TeamService {
    db: Arc<StorageBackend>,
}

impl TeamService {
    pub fn new(db: Arc<StorageBackend>) -> Self {
        Self { db }
    }

    /// Teams the caller belongs to
    pub async fn list_for_user(&self, caller: &AuthUser) -> ServiceResult<Vec<Team>> {
        let rows = self.db.list_teams_for_user(caller.id).await?;
        Ok(rows.into_iter().map(Self::row_to_team).collect())
    }

    pub async fn create(&self, name: &str) -> ServiceResult<Team> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("name is required"));
        }

        let row = self
            .db
            .create_team(name)
            .await?
            .ok_or_else(|| ServiceError::conflict(format!("Team '{name}' already exists")))?;

        tracing::info!(team_id = row.id, name = %row.name, "Team created");
        Ok(Self::row_to_team(row))
    }

    pub async fn add_member(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> ServiceResult<TeamMember> {
        if self.db.get_team(team_id).await?.is_none() {
            return Err(ServiceError::NotFound("team"));
        }
        if self.db.get_user(user_id).await?.is_none() {
            return Err(ServiceError::NotFound("user"));
        }

        let row = self
            .db
            .add_team_member(CreateTeamMemberRow {
                team_id,
                user_id,
                role: role.to_string(),
            })
            .await?
            .ok_or_else(|| ServiceError::conflict("User is already a member of this team"))?;

        tracing::info!(team_id, user_id, role = %role, "Team member added");
        Ok(Self::row_to_member(row))
    }

    fn row_to_team(row: TeamRow) -> Team {
        Team {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }

    fn row_to_member(row: TeamMemberRow) -> TeamMember {
        TeamMember {
            team_id: row.team_id,
            user_id: row.user_id,
            role: TeamRole::from(row.role.as_str()),
            created_at: row.created_at,
        }
    }
}
