// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: Ids come from one shared atomic sequence
//
// Mirrors the PostgreSQL repository API so the server can run without a
// database. Uniqueness rules match the schema's UNIQUE constraints.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use teamcal_core::SortOrder;

use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<i64, UserRow>>,
    teams: RwLock<HashMap<i64, TeamRow>>,
    team_members: RwLock<HashMap<(i64, i64), TeamMemberRow>>,
    events: RwLock<HashMap<i64, EventRow>>,
    // Keyed by (user_id, game_type)
    scores: RwLock<HashMap<(i64, String), GameScoreRow>>,
    sequence: AtomicI64,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, AtomicOrdering::SeqCst) + 1
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<Option<UserRow>> {
        let mut users = self.users.write();
        if users
            .values()
            .any(|u| u.employee_number == input.employee_number)
        {
            return Ok(None);
        }

        let now = Self::now();
        let row = UserRow {
            id: self.next_id(),
            employee_number: input.employee_number,
            name: input.name,
            role: input.role,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        users.insert(row.id, row.clone());
        Ok(Some(row))
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        Ok(self.users.read().get(&id).cloned())
    }

    pub async fn get_user_by_employee_number(
        &self,
        employee_number: &str,
    ) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.employee_number == employee_number)
            .cloned())
    }

    pub async fn list_users(&self, status: Option<&str>) -> Result<Vec<UserRow>> {
        let mut users: Vec<UserRow> = self
            .users
            .read()
            .values()
            .filter(|u| status.map_or(true, |s| u.status == s))
            .cloned()
            .collect();
        users.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(users)
    }

    pub async fn update_user_status(&self, id: i64, status: &str) -> Result<Option<UserRow>> {
        let mut users = self.users.write();
        Ok(users.get_mut(&id).map(|user| {
            user.status = status.to_string();
            user.updated_at = Self::now();
            user.clone()
        }))
    }

    pub async fn update_user_role(&self, id: i64, role: &str) -> Result<Option<UserRow>> {
        let mut users = self.users.write();
        Ok(users.get_mut(&id).map(|user| {
            user.role = role.to_string();
            user.updated_at = Self::now();
            user.clone()
        }))
    }

    // ============================================
    // Teams
    // ============================================

    pub async fn create_team(&self, name: &str) -> Result<Option<TeamRow>> {
        let mut teams = self.teams.write();
        if teams.values().any(|t| t.name == name) {
            return Ok(None);
        }

        let row = TeamRow {
            id: self.next_id(),
            name: name.to_string(),
            created_at: Self::now(),
        };
        teams.insert(row.id, row.clone());
        Ok(Some(row))
    }

    pub async fn get_team(&self, id: i64) -> Result<Option<TeamRow>> {
        Ok(self.teams.read().get(&id).cloned())
    }

    pub async fn list_teams_for_user(&self, user_id: i64) -> Result<Vec<TeamRow>> {
        let team_ids = self.list_team_ids_for_user(user_id).await?;
        let teams = self.teams.read();
        let mut rows: Vec<TeamRow> = team_ids
            .iter()
            .filter_map(|id| teams.get(id).cloned())
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    pub async fn add_team_member(
        &self,
        input: CreateTeamMemberRow,
    ) -> Result<Option<TeamMemberRow>> {
        if !self.teams.read().contains_key(&input.team_id) {
            return Err(anyhow!(
                "team {} does not exist (foreign key violation)",
                input.team_id
            ));
        }

        let mut members = self.team_members.write();
        let key = (input.team_id, input.user_id);
        if members.contains_key(&key) {
            return Ok(None);
        }

        let row = TeamMemberRow {
            team_id: input.team_id,
            user_id: input.user_id,
            role: input.role,
            created_at: Self::now(),
        };
        members.insert(key, row.clone());
        Ok(Some(row))
    }

    pub async fn is_team_member(&self, team_id: i64, user_id: i64) -> Result<bool> {
        Ok(self.team_members.read().contains_key(&(team_id, user_id)))
    }

    pub async fn list_team_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .team_members
            .read()
            .keys()
            .filter(|(_, member)| *member == user_id)
            .map(|(team, _)| *team)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        if !self.teams.read().contains_key(&input.team_id) {
            return Err(anyhow!(
                "team {} does not exist (foreign key violation)",
                input.team_id
            ));
        }

        let now = Self::now();
        let row = EventRow {
            id: self.next_id(),
            title: input.title,
            description: input.description,
            event_type: input.event_type,
            start_date: Some(input.start_date),
            end_date: Some(input.end_date),
            start_time: None,
            end_time: None,
            user_id: input.user_id,
            team_id: input.team_id,
            created_at: now,
            updated_at: now,
        };
        self.events.write().insert(row.id, row.clone());
        Ok(row)
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        Ok(self.events.read().get(&id).cloned())
    }

    pub async fn list_events(&self, filter: EventFilter) -> Result<Vec<EventRow>> {
        let mut rows: Vec<EventRow> = self
            .events
            .read()
            .values()
            .filter(|e| {
                filter
                    .team_ids
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&e.team_id))
            })
            .filter(|e| match (filter.from, stored_end(e)) {
                (Some(from), Some(end)) => end >= from,
                _ => true,
            })
            .filter(|e| match (filter.to, stored_start(e)) {
                (Some(to), Some(start)) => start <= to,
                _ => true,
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            match (stored_start(a), stored_start(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    pub async fn update_event(&self, id: i64, input: UpdateEvent) -> Result<Option<EventRow>> {
        let mut events = self.events.write();
        let Some(event) = events.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            event.title = title;
        }
        if let Some(description) = input.description {
            event.description = Some(description);
        }
        if let Some(event_type) = input.event_type {
            event.event_type = event_type;
        }
        if let Some(start) = input.start_date {
            event.start_date = Some(start);
            event.start_time = None;
        }
        if let Some(end) = input.end_date {
            event.end_date = Some(end);
            event.end_time = None;
        }
        event.updated_at = Self::now();
        Ok(Some(event.clone()))
    }

    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        Ok(self.events.write().remove(&id).is_some())
    }

    // ============================================
    // Game scores
    // ============================================

    /// Compare and write under a single write lock
    pub async fn submit_score(&self, input: SubmitScoreRow) -> Result<SubmitOutcome> {
        let mut scores = self.scores.write();
        let now = Self::now();
        let key = (input.user_id, input.game_type.clone());

        if let Some(existing) = scores.get_mut(&key) {
            if !input.order.is_better(input.score, existing.score) {
                return Ok(SubmitOutcome {
                    row: existing.clone(),
                    improved: false,
                });
            }
            existing.score = input.score;
            existing.metadata = input.metadata;
            existing.updated_at = now;
            return Ok(SubmitOutcome {
                row: existing.clone(),
                improved: true,
            });
        }

        let row = GameScoreRow {
            id: self.next_id(),
            user_id: input.user_id,
            game_type: input.game_type,
            score: input.score,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
        };
        scores.insert(key, row.clone());
        Ok(SubmitOutcome {
            row,
            improved: true,
        })
    }

    pub async fn get_score(&self, user_id: i64, game_type: &str) -> Result<Option<GameScoreRow>> {
        Ok(self
            .scores
            .read()
            .get(&(user_id, game_type.to_string()))
            .cloned())
    }

    pub async fn count_scores(&self, game_type: &str) -> Result<i64> {
        let count = self
            .scores
            .read()
            .values()
            .filter(|s| s.game_type == game_type)
            .count();
        Ok(count as i64)
    }

    pub async fn list_ranked_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        let rows = self.sorted_scores(game_type, order, |_| true);
        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    pub async fn count_better_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
    ) -> Result<i64> {
        let count = self
            .scores
            .read()
            .values()
            .filter(|s| s.game_type == game_type && order.is_better(s.score, score))
            .count();
        Ok(count as i64)
    }

    pub async fn list_better_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
        limit: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        let mut rows = self.sorted_scores(game_type, order, |s| order.is_better(s, score));
        // Nearest first
        rows.reverse();
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    pub async fn list_worse_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
        limit: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        let mut rows = self.sorted_scores(game_type, order, |s| order.is_better(score, s));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    /// Rows for one game matching `keep`, sorted by `order` then ascending id
    fn sorted_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        keep: impl Fn(f64) -> bool,
    ) -> Vec<RankedScoreRow> {
        let users = self.users.read();
        let mut rows: Vec<RankedScoreRow> = self
            .scores
            .read()
            .values()
            .filter(|s| s.game_type == game_type && keep(s.score))
            .map(|s| RankedScoreRow {
                id: s.id,
                user_id: s.user_id,
                user_name: users.get(&s.user_id).map(|u| u.name.clone()),
                score: s.score,
                metadata: s.metadata.clone(),
                updated_at: s.updated_at,
            })
            .collect();
        rows.sort_by(|a, b| order.compare(a.score, b.score).then_with(|| a.id.cmp(&b.id)));
        rows
    }
}

fn stored_start(e: &EventRow) -> Option<DateTime<Utc>> {
    e.start_date
        .or(e.start_time)
        .or(e.end_date)
        .or(e.end_time)
}

fn stored_end(e: &EventRow) -> Option<DateTime<Utc>> {
    e.end_date
        .or(e.end_time)
        .or(e.start_date)
        .or(e.start_time)
}
