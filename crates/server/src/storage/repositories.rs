// Repository layer for PostgreSQL
// Users/Teams are reference data; Events and GameScores are the working tables

use anyhow::{anyhow, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use teamcal_core::SortOrder;

use super::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection from URL and apply pending migrations
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    // ============================================
    // Users
    // ============================================

    /// Returns `None` when the employee number is already taken
    pub async fn create_user(&self, input: CreateUserRow) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (employee_number, name, role, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (employee_number) DO NOTHING
            RETURNING id, employee_number, name, role, status, created_at, updated_at
            "#,
        )
        .bind(&input.employee_number)
        .bind(&input.name)
        .bind(&input.role)
        .bind(&input.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, employee_number, name, role, status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_employee_number(
        &self,
        employee_number: &str,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, employee_number, name, role, status, created_at, updated_at
            FROM users
            WHERE employee_number = $1
            "#,
        )
        .bind(employee_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_users(&self, status: Option<&str>) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, employee_number, name, role, status, created_at, updated_at
            FROM users
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_user_status(&self, id: i64, status: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, employee_number, name, role, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_user_role(&self, id: i64, role: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, employee_number, name, role, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Teams
    // ============================================

    /// Returns `None` when the name is already taken
    pub async fn create_team(&self, name: &str) -> Result<Option<TeamRow>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO teams (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_team(&self, id: i64) -> Result<Option<TeamRow>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, created_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_teams_for_user(&self, user_id: i64) -> Result<Vec<TeamRow>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM teams t
            JOIN team_members m ON m.team_id = t.id
            WHERE m.user_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Returns `None` when the user is already a member
    pub async fn add_team_member(
        &self,
        input: CreateTeamMemberRow,
    ) -> Result<Option<TeamMemberRow>> {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            INSERT INTO team_members (team_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, user_id) DO NOTHING
            RETURNING team_id, user_id, role, created_at
            "#,
        )
        .bind(input.team_id)
        .bind(input.user_id)
        .bind(&input.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn is_team_member(&self, team_id: i64, user_id: i64) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM team_members WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn list_team_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT team_id FROM team_members WHERE user_id = $1 ORDER BY team_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEventRow) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (title, description, event_type, start_date, end_date, user_id, team_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, event_type, start_date, end_date, start_time, end_time,
                      user_id, team_id, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.event_type)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.user_id)
        .bind(input.team_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, event_type, start_date, end_date, start_time, end_time,
                   user_id, team_id, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self, filter: EventFilter) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, event_type, start_date, end_date, start_time, end_time,
                   user_id, team_id, created_at, updated_at
            FROM events
            WHERE ($1::BIGINT[] IS NULL OR team_id = ANY($1))
              AND ($2::TIMESTAMPTZ IS NULL
                   OR COALESCE(end_date, end_time, start_date, start_time) >= $2)
              AND ($3::TIMESTAMPTZ IS NULL
                   OR COALESCE(start_date, start_time, end_date, end_time) <= $3)
            ORDER BY COALESCE(start_date, start_time) ASC NULLS LAST, id ASC
            "#,
        )
        .bind(&filter.team_ids)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: i64, input: UpdateEvent) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_type = COALESCE($4, event_type),
                start_date = COALESCE($5, start_date),
                start_time = CASE WHEN $5::TIMESTAMPTZ IS NULL THEN start_time ELSE NULL END,
                end_date = COALESCE($6, end_date),
                end_time = CASE WHEN $6::TIMESTAMPTZ IS NULL THEN end_time ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, event_type, start_date, end_date, start_time, end_time,
                      user_id, team_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.event_type)
        .bind(input.start_date)
        .bind(input.end_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM events WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Game scores
    // ============================================

    /// Insert or improve the best score in one statement.
    ///
    /// The conflict branch only fires when the new score is strictly better,
    /// so concurrent submissions cannot overwrite a better stored value.
    pub async fn submit_score(&self, input: SubmitScoreRow) -> Result<SubmitOutcome> {
        let written = sqlx::query_as::<_, GameScoreRow>(
            r#"
            INSERT INTO game_scores (user_id, game_type, score, metadata)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, game_type) DO UPDATE
            SET score = EXCLUDED.score,
                metadata = EXCLUDED.metadata,
                updated_at = NOW()
            WHERE CASE
                WHEN $5::BOOLEAN THEN EXCLUDED.score < game_scores.score
                ELSE EXCLUDED.score > game_scores.score
            END
            RETURNING id, user_id, game_type, score, metadata, created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.game_type)
        .bind(input.score)
        .bind(&input.metadata)
        .bind(input.order == SortOrder::Asc)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = written {
            return Ok(SubmitOutcome {
                row,
                improved: true,
            });
        }

        let row = self
            .get_score(input.user_id, &input.game_type)
            .await?
            .ok_or_else(|| {
                anyhow!(
                    "best score for user {} in {} disappeared during submit",
                    input.user_id,
                    input.game_type
                )
            })?;

        Ok(SubmitOutcome {
            row,
            improved: false,
        })
    }

    pub async fn get_score(&self, user_id: i64, game_type: &str) -> Result<Option<GameScoreRow>> {
        let row = sqlx::query_as::<_, GameScoreRow>(
            r#"
            SELECT id, user_id, game_type, score, metadata, created_at, updated_at
            FROM game_scores
            WHERE user_id = $1 AND game_type = $2
            "#,
        )
        .bind(user_id)
        .bind(game_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn count_scores(&self, game_type: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM game_scores WHERE game_type = $1
            "#,
        )
        .bind(game_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// One page of best scores, best first, ties by id
    pub async fn list_ranked_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        let sql = format!(
            r#"
            SELECT s.id, s.user_id, u.name AS user_name, s.score, s.metadata, s.updated_at
            FROM game_scores s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE s.game_type = $1
            ORDER BY s.score {dir}, s.id ASC
            LIMIT $2 OFFSET $3
            "#,
            dir = order.as_sql()
        );

        let rows = sqlx::query_as::<_, RankedScoreRow>(&sql)
            .bind(game_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count_better_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
    ) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM game_scores WHERE game_type = $1 AND score {op} $2",
            op = order.better_op()
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(game_type)
            .bind(score)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Strictly better scores, nearest to `score` first
    pub async fn list_better_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
        limit: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        let sql = format!(
            r#"
            SELECT s.id, s.user_id, u.name AS user_name, s.score, s.metadata, s.updated_at
            FROM game_scores s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE s.game_type = $1 AND s.score {op} $2
            ORDER BY s.score {dir}, s.id DESC
            LIMIT $3
            "#,
            op = order.better_op(),
            dir = order.reversed().as_sql()
        );

        let rows = sqlx::query_as::<_, RankedScoreRow>(&sql)
            .bind(game_type)
            .bind(score)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Strictly worse scores, nearest to `score` first
    pub async fn list_worse_scores(
        &self,
        game_type: &str,
        order: SortOrder,
        score: f64,
        limit: i64,
    ) -> Result<Vec<RankedScoreRow>> {
        let sql = format!(
            r#"
            SELECT s.id, s.user_id, u.name AS user_name, s.score, s.metadata, s.updated_at
            FROM game_scores s
            LEFT JOIN users u ON u.id = s.user_id
            WHERE s.game_type = $1 AND s.score {op} $2
            ORDER BY s.score {dir}, s.id ASC
            LIMIT $3
            "#,
            op = order.worse_op(),
            dir = order.as_sql()
        );

        let rows = sqlx::query_as::<_, RankedScoreRow>(&sql)
            .bind(game_type)
            .bind(score)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
