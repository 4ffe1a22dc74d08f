// Team HTTP routes
// Decision: Team administration is admin-only; members only read their own teams

use crate::auth::middleware::{AdminUser, AuthState, AuthUser, FromRef};
use crate::services::{ServiceError, TeamService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use teamcal_core::{Team, TeamMember, TeamRole};
use utoipa::ToSchema;

use super::common::{ErrorResponse, ListResponse};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[schema(example = "Platform")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: i64,
    /// Defaults to MEMBER
    #[serde(default)]
    pub role: Option<TeamRole>,
}

/// App state for team routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TeamService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<TeamService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

/// Create team routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/teams", post(create_team))
        .route("/teams/my", get(list_my_teams))
        .route("/teams/:id/members", post(add_member))
        .with_state(state)
}

/// GET /teams/my - Teams the caller belongs to
#[utoipa::path(
    get,
    path = "/teams/my",
    responses(
        (status = 200, description = "Caller's teams", body = ListResponse<Team>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "teams"
)]
pub async fn list_my_teams(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ListResponse<Team>>, ServiceError> {
    let teams = state.service.list_for_user(&user).await?;
    Ok(Json(ListResponse::new(teams)))
}

/// POST /teams - Create a team (admin only)
#[utoipa::path(
    post,
    path = "/teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "teams"
)]
pub async fn create_team(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>), ServiceError> {
    let team = state.service.create(&req.name).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// POST /teams/{id}/members - Add a user to a team (admin only)
#[utoipa::path(
    post,
    path = "/teams/{id}/members",
    params(
        ("id" = i64, Path, description = "Team ID")
    ),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = TeamMember),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Team or user not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "teams"
)]
pub async fn add_member(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(team_id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<TeamMember>), ServiceError> {
    let member = state
        .service
        .add_member(team_id, req.user_id, req.role.unwrap_or(TeamRole::Member))
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}
