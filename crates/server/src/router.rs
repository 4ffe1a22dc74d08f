// Router assembly
// Decision: Health stays unprefixed; API routes nest under API_PREFIX
// Decision: CORS layer only when origins are configured

use axum::http::{header, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::auth::{AuthConfig, AuthState};
use crate::config::ServerConfig;
use crate::openapi::ApiDoc;
use crate::services::{EventService, ScoreService, TeamService, UserService};
use crate::storage::StorageBackend;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    auth_mode: &'static str,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    auth_mode: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_mode: state.auth_mode,
    })
}

/// Build the full application router
pub fn build_router(
    config: &ServerConfig,
    auth_config: AuthConfig,
    db: Arc<StorageBackend>,
) -> Router {
    let auth_state = AuthState::new(auth_config.clone(), db.clone());

    // Create module-specific states
    let events_state = api::events::AppState::new(
        Arc::new(EventService::new(
            db.clone(),
            config.zone,
            config.is_production(),
        )),
        auth_state.clone(),
    );
    let scores_state =
        api::scores::AppState::new(Arc::new(ScoreService::new(db.clone())), auth_state.clone());
    let lottery_state = api::lottery::AppState {
        auth: auth_state.clone(),
    };
    let teams_state =
        api::teams::AppState::new(Arc::new(TeamService::new(db.clone())), auth_state.clone());
    let users_state = api::users::UsersState {
        service: Arc::new(UserService::new(db)),
        auth: auth_state,
    };
    let health_state = HealthState {
        auth_mode: auth_config.mode.as_str(),
    };

    let api_routes = Router::new()
        .merge(api::events::routes(events_state))
        .merge(api::scores::routes(scores_state))
        .merge(api::lottery::routes(lottery_state))
        .merge(api::teams::routes(teams_state))
        .merge(api::users::routes(users_state));

    // Health is not prefixed
    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let app = if config.cors_origins.is_empty() {
        app
    } else {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional API prefix
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
