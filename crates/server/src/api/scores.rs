// Game leaderboard HTTP routes
// Decision: Unknown game types are rejected with 400, not 404

use crate::auth::middleware::{AuthState, AuthUser, FromRef};
use crate::services::{ScoreService, ServiceError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use teamcal_core::{GameScore, RankedScore};
use utoipa::{IntoParams, ToSchema};

use super::common::ErrorResponse;

pub const SCORE_SAVED: &str = "Score saved";
pub const SCORE_NOT_IMPROVED: &str = "Score not improved";

/// Request to submit a game result
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    #[schema(example = "reaction-time")]
    pub game_type: String,
    #[schema(example = 231.0)]
    pub score: f64,
    /// Opaque per-game details, stored alongside the best score
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    /// Stored best score after this submission
    pub score: GameScore,
    pub improved: bool,
    pub message: String,
}

/// Query parameters for leaderboard pages
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    /// Page size, 1..=100 (default 10)
    pub limit: Option<i64>,
    /// Rows to skip (default 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub rankings: Vec<RankedScore>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyRankResponse {
    pub score: Option<GameScore>,
    pub rank: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AroundMeResponse {
    pub rankings: Vec<RankedScore>,
    pub my_rank: Option<i64>,
}

/// App state for score routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScoreService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<ScoreService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

/// Create score routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/games/scores", post(submit_score))
        .route("/games/scores/:game_type", get(get_leaderboard))
        .route("/games/scores/:game_type/my", get(get_my_rank))
        .route("/games/scores/:game_type/around-me", get(get_around_me))
        .with_state(state)
}

/// POST /games/scores - Submit a result; only a strictly better score is kept
#[utoipa::path(
    post,
    path = "/games/scores",
    request_body = SubmitScoreRequest,
    responses(
        (status = 201, description = "Submission processed", body = SubmitScoreResponse),
        (status = 400, description = "Unknown game type or invalid score", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "games"
)]
pub async fn submit_score(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<(StatusCode, Json<SubmitScoreResponse>), ServiceError> {
    let submission = state.service.submit(&user, req).await?;
    let message = if submission.improved {
        SCORE_SAVED
    } else {
        SCORE_NOT_IMPROVED
    };

    Ok((
        StatusCode::CREATED,
        Json(SubmitScoreResponse {
            score: submission.score,
            improved: submission.improved,
            message: message.to_string(),
        }),
    ))
}

/// GET /games/scores/{game_type} - Leaderboard page
#[utoipa::path(
    get,
    path = "/games/scores/{game_type}",
    params(
        ("game_type" = String, Path, description = "Game type, e.g. reaction-time"),
        LeaderboardQuery
    ),
    responses(
        (status = 200, description = "Leaderboard page", body = LeaderboardResponse),
        (status = 400, description = "Unknown game type", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "games"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(game_type): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ServiceError> {
    let page = state.service.leaderboard(&game_type, query).await?;
    Ok(Json(page))
}

/// GET /games/scores/{game_type}/my - Caller's best score and rank
#[utoipa::path(
    get,
    path = "/games/scores/{game_type}/my",
    params(
        ("game_type" = String, Path, description = "Game type, e.g. reaction-time")
    ),
    responses(
        (status = 200, description = "Best score and rank, or nulls", body = MyRankResponse),
        (status = 400, description = "Unknown game type", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "games"
)]
pub async fn get_my_rank(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_type): Path<String>,
) -> Result<Json<MyRankResponse>, ServiceError> {
    let mine = state.service.my_rank(&user, &game_type).await?;
    Ok(Json(mine))
}

/// GET /games/scores/{game_type}/around-me - Neighbours of the caller's rank
#[utoipa::path(
    get,
    path = "/games/scores/{game_type}/around-me",
    params(
        ("game_type" = String, Path, description = "Game type, e.g. reaction-time")
    ),
    responses(
        (status = 200, description = "Up to 5 better rows, the caller, up to 5 worse rows", body = AroundMeResponse),
        (status = 400, description = "Unknown game type", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "games"
)]
pub async fn get_around_me(
    State(state): State<AppState>,
    user: AuthUser,
    Path(game_type): Path<String>,
) -> Result<Json<AroundMeResponse>, ServiceError> {
    let around = state.service.around_me(&user, &game_type).await?;
    Ok(Json(around))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_my_rank_serializes_nulls() {
        let json = serde_json::to_value(MyRankResponse {
            score: None,
            rank: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"score": null, "rank": null}));
    }

    #[test]
    fn test_around_me_uses_camel_case() {
        let json = serde_json::to_value(AroundMeResponse {
            rankings: vec![],
            my_rank: None,
        })
        .unwrap();
        assert!(json.get("myRank").is_some());
    }
}
