// Calendar event HTTP routes

use crate::auth::middleware::{AuthState, AuthUser, FromRef};
use crate::services::{EventService, ServiceError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use teamcal_core::Event;
use utoipa::{IntoParams, ToSchema};

use super::common::{ErrorResponse, ListResponse};
use super::validation::{validate_create_event_input, validate_update_event_input};

/// Request to create an event.
///
/// Dates are wall-clock readings: `YYYY-MM-DD`, `YYYY-MM-DDTHH:mm` or
/// `YYYY-MM-DD HH:mm`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[schema(example = "Sprint review")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// VACATION, MEETING, TRAINING, BUSINESS_TRIP or OTHER
    #[schema(example = "MEETING")]
    pub event_type: String,
    #[schema(example = "2025-06-10T09:00")]
    pub start_date: String,
    #[schema(example = "2025-06-10T18:00")]
    pub end_date: String,
    /// Legacy `HH:mm`, combined with a date-only `startDate`
    #[serde(default)]
    pub start_time: Option<String>,
    /// Legacy `HH:mm`, combined with a date-only `endDate`
    #[serde(default)]
    pub end_time: Option<String>,
    pub team_id: i64,
}

/// Request to update an event. Only provided fields will be updated.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Query parameters for listing events
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// Restrict to one team. Defaults to all of the caller's teams.
    pub team_id: Option<i64>,
    /// Keep events ending on or after this date
    pub start_date: Option<String>,
    /// Keep events starting on or before this date
    pub end_date: Option<String>,
}

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<EventService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state)
}

/// POST /events - Create an event in one of the caller's teams
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of the team", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ServiceError> {
    validate_create_event_input(&req.title, req.description.as_deref())?;
    let event = state.service.create(&user, req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events - List events for display
///
/// Each item's `end` is exclusive (next local midnight); `startDate`/`endDate`
/// keep the stored values.
#[utoipa::path(
    get,
    path = "/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events overlapping the range", body = ListResponse<Event>),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of the team", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<Event>>, ServiceError> {
    let events = state.service.list(&user, query).await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /events/{id} - Get one event with inclusive start/end
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Event>, ServiceError> {
    let event = state.service.get(&user, id).await?;
    Ok(Json(event))
}

/// PUT /events/{id} - Partially update an event (owner or admin)
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ServiceError> {
    validate_update_event_input(req.title.as_deref(), req.description.as_deref())?;
    let event = state.service.update(&user, id, req).await?;
    Ok(Json(event))
}

/// DELETE /events/{id} - Delete an event (owner or admin)
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
