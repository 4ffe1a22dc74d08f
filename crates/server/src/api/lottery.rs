// Lunch lottery HTTP route

use crate::auth::middleware::{AuthState, AuthUser, FromRef};
use crate::services::ServiceError;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use teamcal_core::lottery::draw;
use utoipa::ToSchema;

use super::common::ErrorResponse;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    /// Names to draw from. Blank and repeated names are ignored.
    #[schema(example = json!(["Kim", "Lee", "Park"]))]
    pub candidates: Vec<String>,
    /// Number of winners (default 1)
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    pub winners: Vec<String>,
}

/// App state for lottery routes
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

/// Create lottery routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/lottery/draw", post(draw_winners))
        .with_state(state)
}

/// POST /lottery/draw - Pick distinct winners uniformly at random
#[utoipa::path(
    post,
    path = "/lottery/draw",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "Winners drawn", body = DrawResponse),
        (status = 400, description = "No candidates or invalid count", body = ErrorResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "lottery"
)]
pub async fn draw_winners(
    State(_state): State<AppState>,
    user: AuthUser,
    Json(req): Json<DrawRequest>,
) -> Result<Json<DrawResponse>, ServiceError> {
    let count = req.count.unwrap_or(1);
    let winners = draw(&req.candidates, count, &mut rand::thread_rng())?;
    tracing::debug!(user_id = user.id, winners = winners.len(), "Lottery drawn");
    Ok(Json(DrawResponse { winners }))
}
