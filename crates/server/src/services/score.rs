// Score service: best-score-per-user leaderboards
// Decision: Compare-and-write happens inside storage as one atomic operation
// Decision: Ranks are computed from strict better-counts, so ties share a rank

use crate::api::scores::{
    AroundMeResponse, LeaderboardQuery, LeaderboardResponse, MyRankResponse, SubmitScoreRequest,
};
use crate::api::validation::{validate_metadata, validate_score};
use crate::auth::AuthUser;
use crate::storage::{GameScoreRow, RankedScoreRow, StorageBackend, SubmitScoreRow};
use std::sync::Arc;
use teamcal_core::ranking::{
    assemble_around, rank_from_better_count, rank_page, ScoreEntry, AROUND_ME_WINDOW,
};
use teamcal_core::{GameScore, GameType};

use super::error::ServiceResult;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Stored best after a submission
#[derive(Debug, Clone)]
pub struct Submission {
    pub score: GameScore,
    pub improved: bool,
}

pub struct ScoreService {
    db: Arc<StorageBackend>,
}

impl ScoreService {
    pub fn new(db: Arc<StorageBackend>) -> Self {
        Self { db }
    }

    pub async fn submit(&self, caller: &AuthUser, req: SubmitScoreRequest) -> ServiceResult<Submission> {
        let game_type: GameType = req.game_type.parse()?;
        validate_score(req.score)?;
        validate_metadata(req.metadata.as_ref())?;

        let outcome = self
            .db
            .submit_score(SubmitScoreRow {
                user_id: caller.id,
                game_type: game_type.as_str().to_string(),
                score: req.score,
                metadata: req.metadata,
                order: game_type.sort_order(),
            })
            .await?;

        tracing::info!(
            user_id = caller.id,
            game_type = game_type.as_str(),
            score = req.score,
            best = outcome.row.score,
            improved = outcome.improved,
            "Score submitted"
        );

        Ok(Submission {
            score: Self::row_to_score(outcome.row, game_type),
            improved: outcome.improved,
        })
    }

    pub async fn leaderboard(
        &self,
        game_type: &str,
        query: LeaderboardQuery,
    ) -> ServiceResult<LeaderboardResponse> {
        let game_type: GameType = game_type.parse()?;
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = query.offset.unwrap_or(0).max(0);
        let key = game_type.as_str();

        let total = self.db.count_scores(key).await?;
        let rows = self
            .db
            .list_ranked_scores(key, game_type.sort_order(), limit, offset)
            .await?;

        Ok(LeaderboardResponse {
            rankings: rank_page(rows.into_iter().map(Self::row_to_entry).collect(), offset),
            total,
            limit,
            offset,
        })
    }

    pub async fn my_rank(&self, caller: &AuthUser, game_type: &str) -> ServiceResult<MyRankResponse> {
        let game_type: GameType = game_type.parse()?;
        let key = game_type.as_str();

        let Some(row) = self.db.get_score(caller.id, key).await? else {
            return Ok(MyRankResponse {
                score: None,
                rank: None,
            });
        };

        let better = self
            .db
            .count_better_scores(key, game_type.sort_order(), row.score)
            .await?;

        Ok(MyRankResponse {
            rank: Some(rank_from_better_count(better)),
            score: Some(Self::row_to_score(row, game_type)),
        })
    }

    pub async fn around_me(
        &self,
        caller: &AuthUser,
        game_type: &str,
    ) -> ServiceResult<AroundMeResponse> {
        let game_type: GameType = game_type.parse()?;
        let key = game_type.as_str();
        let order = game_type.sort_order();

        let Some(row) = self.db.get_score(caller.id, key).await? else {
            return Ok(AroundMeResponse {
                rankings: Vec::new(),
                my_rank: None,
            });
        };

        let window = AROUND_ME_WINDOW as i64;
        let my_rank = rank_from_better_count(self.db.count_better_scores(key, order, row.score).await?);
        let above = self.db.list_better_scores(key, order, row.score, window).await?;
        let below = self.db.list_worse_scores(key, order, row.score, window).await?;

        let me = ScoreEntry {
            user_id: row.user_id,
            user_name: self
                .db
                .get_user(row.user_id)
                .await?
                .map(|u| u.name),
            score: row.score,
            metadata: row.metadata,
            updated_at: row.updated_at,
        };

        Ok(AroundMeResponse {
            rankings: assemble_around(
                my_rank,
                me,
                above.into_iter().map(Self::row_to_entry).collect(),
                below.into_iter().map(Self::row_to_entry).collect(),
            ),
            my_rank: Some(my_rank),
        })
    }

    fn row_to_entry(row: RankedScoreRow) -> ScoreEntry {
        ScoreEntry {
            user_id: row.user_id,
            user_name: row.user_name,
            score: row.score,
            metadata: row.metadata,
            updated_at: row.updated_at,
        }
    }

    fn row_to_score(row: GameScoreRow, game_type: GameType) -> GameScore {
        GameScore {
            id: row.id,
            user_id: row.user_id,
            game_type,
            score: row.score,
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
