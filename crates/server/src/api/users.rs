// Users API routes
// Decision: Expose user listing and approval for the admin settings page

use crate::auth::middleware::{AdminUser, AuthState, FromRef};
use crate::services::{ServiceError, UserService};
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use teamcal_core::{ApprovalStatus, User};
use utoipa::{IntoParams, ToSchema};

use super::common::{ErrorResponse, ListResponse};

/// App state for users routes
#[derive(Clone)]
pub struct UsersState {
    pub service: Arc<UserService>,
    pub auth: AuthState,
}

impl FromRef<UsersState> for AuthState {
    fn from_ref(input: &UsersState) -> Self {
        input.auth.clone()
    }
}

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Filter by approval status (PENDING, APPROVED, REJECTED)
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub status: Option<ApprovalStatus>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ApprovalStatus,
}

/// Create users routes
pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/status", patch(update_user_status))
        .with_state(state)
}

/// GET /users - List users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "List of users", body = ListResponse<User>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<UsersState>,
    _admin: AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListResponse<User>>, ServiceError> {
    let users = state.service.list(query.status).await?;
    Ok(Json(ListResponse::new(users)))
}

/// PATCH /users/{id}/status - Approve or reject an account (admin only)
#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user_status(
    State(state): State<UsersState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<User>, ServiceError> {
    let user = state.service.update_status(id, req.status).await?;
    tracing::info!(admin_id = admin.id, user_id = id, status = %req.status, "Account status changed");
    Ok(Json(user))
}
