// OpenAPI specification generation
//
// Used by both the API server (for Swagger UI) and the export-openapi binary
// (for static spec generation).

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use teamcal_core::{
    ApprovalStatus, Event, EventType, GameScore, GameType, RankedScore, Role, Team, TeamMember,
    TeamRole, User,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the team calendar API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::create_event,
        api::events::list_events,
        api::events::get_event,
        api::events::update_event,
        api::events::delete_event,
        api::scores::submit_score,
        api::scores::get_leaderboard,
        api::scores::get_my_rank,
        api::scores::get_around_me,
        api::lottery::draw_winners,
        api::teams::list_my_teams,
        api::teams::create_team,
        api::teams::add_member,
        api::users::list_users,
        api::users::update_user_status,
    ),
    components(
        schemas(
            Event, EventType,
            GameScore, GameType, RankedScore,
            Team, TeamMember, TeamRole,
            User, Role, ApprovalStatus,
            ErrorResponse,
            ListResponse<Event>,
            ListResponse<Team>,
            ListResponse<User>,
            api::events::CreateEventRequest,
            api::events::UpdateEventRequest,
            api::scores::SubmitScoreRequest,
            api::scores::SubmitScoreResponse,
            api::scores::LeaderboardResponse,
            api::scores::MyRankResponse,
            api::scores::AroundMeResponse,
            api::lottery::DrawRequest,
            api::lottery::DrawResponse,
            api::teams::CreateTeamRequest,
            api::teams::AddMemberRequest,
            api::users::UpdateStatusRequest,
        )
    ),
    tags(
        (name = "events", description = "Team calendar events"),
        (name = "games", description = "Mini-game leaderboards"),
        (name = "lottery", description = "Lunch lottery"),
        (name = "teams", description = "Team lookup and administration"),
        (name = "users", description = "User approval administration")
    ),
    info(
        title = "Teamcal API",
        version = "0.3.0",
        description = "API for team calendars, mini-game leaderboards and the lunch lottery",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> String {
        Self::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI spec")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_all_paths() {
        let spec: serde_json::Value = serde_json::from_str(&ApiDoc::to_json()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for path in [
            "/events",
            "/events/{id}",
            "/games/scores",
            "/games/scores/{game_type}",
            "/games/scores/{game_type}/my",
            "/games/scores/{game_type}/around-me",
            "/lottery/draw",
            "/teams",
            "/teams/my",
            "/teams/{id}/members",
            "/users",
            "/users/{id}/status",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
