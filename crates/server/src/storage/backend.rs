// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// Works with either PostgreSQL (production) or in-memory (dev mode) storage.

use anyhow::Result;
use std::sync::Arc;
use teamcal_core::SortOrder;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user(id).await,
            Self::InMemory(db) => db.get_user(id).await,
        }
    }

    pub async fn get_user_by_employee_number(
        &self,
        employee_number: &str,
    ) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_employee_number(employee_number).await,
            Self::InMemory(db) => db.get_user_by_employee_number(employee_number).await,
        }
    }

    pub async fn list_users(&self, status: Option<&str>) -> Result<Vec<UserRow>> {
        match self {
            Self::Postgres(db) => db.list_users(status).await,
            Self::InMemory(db) => db.list_users(status).await,
        }
    }

    pub async fn update_user_status(&self, id: i64, status: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.update_user_status(id, status).await,
            Self::InMemory(db) => db.update_user_status(id, status).await,
        }
    }

    pub async fn update_user_role(&self, id: i64, role: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.update_user_role(id, role).await,
            Self::InMemory(db) => db.update_user_role(id, role).await,
        }
    }

    // ============================================
    // Teams
    // ============================================

    pub async fn create_team(&self, name: &str) -> Result<Option<TeamRow>> {
        match self {
            Self::Postgres(db) => db.create_team(name).await,
            Self::InMemory(db) => db.create_team(name).await,
        }
    }

    pub async fn get_team(&self, id: i64) -> Result<Option<TeamRow>> {
        match self {
            Self::Postgres(db) => db.get_team(id).await,
            Self::InMemory(db) => db.get_team(id).await,
        }
    }

    pub async fn list_teams_for_user(&self, user_id: i64) -> Result<Vec<TeamRow>> {
        match self {
            Self::Postgres(db) => db.list_teams_for_user(user_id).await,
            Self::InMemory(db) => db.list_teams_for_user(user_id).await,
        }
    }

    pub async fn add_team_member(
        &self,
        input: CreateTeamMemberRow,
    ) -> Result<Option<TeamMemberRow>> {
        match self {
            Self::Postgres(db) => db.add_team_member(input).await,
            Self::InMemory(db) => db.add_team_member(input).await,
        }
    }

    pub async fn is_team_member(&self, team_id: i64, user_id: i64) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.is_team_member(team_id, user_id).await,
            Self::InMemory(db) => db.is_team_member(team_id, user_id).await,
        }
    }

    pub async fn list_team_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>> {
        match self {
            Self::Postgres(db) => db.list_team_ids_for_user(user_id).await,
            Self::InMemory(db) => db.list_team_ids_for_user(user_id).await,
        }
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        match self {
            Self::Postgres(db) => db.create_event(input).await,
            Self::InMemory(db) => db.create_event(input).await,
        }
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.get_event(id).await,
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    pub async fn list_events(&self, filter: EventFilter) -> Result<Vec<EventRow>> {
        match self {
            Self::Postgres(db) => db.list_events(filter).await,
            Self::InMemory(db) => db.list_events(filter).await,
        }
    }

    pub async fn update_event(&self, id: i64, input: UpdateEvent) -> Result<Option<EventRow>> {
        match self {
            Self::Postgres(db) => db.update_event(id, input).await,
            Self::InMemory(db) => db.update_event(id, input).await,
        }
    }

    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_event(id).await,
            Self::InMemory(db) => db.delete_event(id).await,
        }
    }

    // ============================================
    // Game scores
    // ============================================

    pub async fn submit_score(&self, input: SubmitScoreRow) -> Result<SubmitOutcome> {
        match self {
            Self::Postgres(db) => db.submit_score(input).await,
            Self::InMemory(db) => db.submit_score(input).await,
        }
    }

    pub async fn get_score(&self, user_id: i64, game_type: &str) -> Result<Option<GameScoreRow>> {
        match self {
            Self::Postgres(db) => db.get_score(user_id, game_type).await,
            Self::InMemory(db) => db.get_score(user_id, game_type).await,
        }
    }

    pub async fn count_scores(&self, game_type: &str) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_scores(game_type).await,
            Self::InMemory(db) => db.count_scores(game_type).await,
        }
    }

    pub async fn list_ranked_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        match self {
            Self::Postgres(db) => db.list_ranked_scores(game_type, order, limit, offset).await,
            Self::InMemory(db) => db.list_ranked_scores(game_type, order, limit, offset).await,
        }
    }

    pub async fn count_better_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
    ) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_better_scores(game_type, order, score).await,
            Self::InMemory(db) => db.count_better_scores(game_type, order, score).await,
        }
    }

    pub async fn list_better_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
        limit: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        match self {
            Self::Postgres(db) => db.list_better_scores(game_type, order, score, limit).await,
            Self::InMemory(db) => db.list_better_scores(game_type, order, score, limit).await,
        }
    }

    pub async fn list_worse_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
        limit: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        match self {
            Self::Postgres(db) => db.list_worse_scores(game_type, order, score, limit).await,
            Self::InMemory(db) => db.list_worse_scores(game_type, order, score, limit).await,
        }
    }
}
