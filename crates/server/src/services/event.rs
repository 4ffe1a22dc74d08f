// Event service: calendar events with legacy date/time reconciliation
// Decision: Writes only populate startDate/endDate and clear the legacy time columns
// Decision: Reads reconcile both column pairs through teamcal_core::schedule

use crate::api::events::{CreateEventRequest, ListEventsQuery, UpdateEventRequest};
use crate::auth::AuthUser;
use crate::storage::{CreateEventRow, EventFilter, EventRow, StorageBackend, UpdateEvent};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use std::sync::Arc;
use teamcal_core::schedule::{
    apply_time_of_day, display_end, parse_date_input, parse_submitted, resolve_instant,
    validate_span, wall_clock_to_utc, DateInput,
};
use teamcal_core::{Event, EventType, LocalZone};

use super::error::{ServiceError, ServiceResult};

pub struct EventService {
    db: Arc<StorageBackend>,
    zone: LocalZone,
    /// Production silences warnings about rows missing both date columns
    production: bool,
}

impl EventService {
    pub fn new(db: Arc<StorageBackend>, zone: LocalZone, production: bool) -> Self {
        Self {
            db,
            zone,
            production,
        }
    }

    pub async fn create(&self, caller: &AuthUser, req: CreateEventRequest) -> ServiceResult<Event> {
        let event_type: EventType = req.event_type.parse()?;
        let start = parse_submitted(&req.start_date, req.start_time.as_deref(), self.zone)?;
        let end = parse_submitted(&req.end_date, req.end_time.as_deref(), self.zone)?;
        validate_span(start, end)?;

        if self.db.get_team(req.team_id).await?.is_none() {
            return Err(ServiceError::NotFound("team"));
        }
        if !caller.is_admin() && !self.db.is_team_member(req.team_id, caller.id).await? {
            return Err(ServiceError::forbidden("Not a member of this team"));
        }

        let row = self
            .db
            .create_event(CreateEventRow {
                title: req.title.trim().to_string(),
                description: req.description,
                event_type: event_type.as_str().to_string(),
                start_date: start,
                end_date: end,
                user_id: caller.id,
                team_id: req.team_id,
            })
            .await?;

        tracing::info!(
            event_id = row.id,
            team_id = row.team_id,
            user_id = caller.id,
            "Event created"
        );

        Ok(self.row_to_event(row))
    }

    pub async fn get(&self, caller: &AuthUser, id: i64) -> ServiceResult<Event> {
        let row = self.load(id).await?;

        let allowed = caller.is_admin()
            || row.user_id == caller.id
            || self.db.is_team_member(row.team_id, caller.id).await?;
        if !allowed {
            return Err(ServiceError::forbidden("Not allowed to view this event"));
        }

        Ok(self.row_to_event(row))
    }

    /// Events for display: `end` is the exclusive next-local-midnight boundary.
    pub async fn list(&self, caller: &AuthUser, query: ListEventsQuery) -> ServiceResult<Vec<Event>> {
        let team_ids = match query.team_id {
            Some(team_id) => {
                if !caller.is_admin() && !self.db.is_team_member(team_id, caller.id).await? {
                    return Err(ServiceError::forbidden("Not a member of this team"));
                }
                Some(vec![team_id])
            }
            None if caller.is_admin() => None,
            None => Some(self.db.list_team_ids_for_user(caller.id).await?),
        };

        let from = query
            .start_date
            .as_deref()
            .map(|s| parse_submitted(s, None, self.zone))
            .transpose()?;
        let to = query
            .end_date
            .as_deref()
            .map(|s| self.range_end(s))
            .transpose()?;

        let rows = self.db.list_events(EventFilter { team_ids, from, to }).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut event = self.row_to_event(row);
                event.end = display_end(event.start, event.end, self.zone);
                event
            })
            .collect())
    }

    pub async fn update(
        &self,
        caller: &AuthUser,
        id: i64,
        req: UpdateEventRequest,
    ) -> ServiceResult<Event> {
        let row = self.load(id).await?;
        if !caller.is_admin() && row.user_id != caller.id {
            return Err(ServiceError::forbidden("Only the owner can modify this event"));
        }

        let event_type = req
            .event_type
            .as_deref()
            .map(str::parse::<EventType>)
            .transpose()?;

        let current = self.row_to_event(row);
        let start = self.changed_instant(
            current.start,
            req.start_date.as_deref(),
            req.start_time.as_deref(),
        )?;
        let end = self.changed_instant(
            current.end,
            req.end_date.as_deref(),
            req.end_time.as_deref(),
        )?;
        validate_span(start.unwrap_or(current.start), end.unwrap_or(current.end))?;

        let updated = self
            .db
            .update_event(
                id,
                UpdateEvent {
                    title: req.title.map(|t| t.trim().to_string()),
                    description: req.description,
                    event_type: event_type.map(|t| t.as_str().to_string()),
                    start_date: start,
                    end_date: end,
                },
            )
            .await?
            .ok_or(ServiceError::NotFound("event"))?;

        tracing::info!(event_id = id, user_id = caller.id, "Event updated");

        Ok(self.row_to_event(updated))
    }

    pub async fn delete(&self, caller: &AuthUser, id: i64) -> ServiceResult<()> {
        let row = self.load(id).await?;
        if !caller.is_admin() && row.user_id != caller.id {
            return Err(ServiceError::forbidden("Only the owner can delete this event"));
        }

        if !self.db.delete_event(id).await? {
            return Err(ServiceError::NotFound("event"));
        }

        tracing::info!(event_id = id, user_id = caller.id, "Event deleted");
        Ok(())
    }

    async fn load(&self, id: i64) -> ServiceResult<EventRow> {
        self.db
            .get_event(id)
            .await?
            .ok_or(ServiceError::NotFound("event"))
    }

    /// New stored instant for one side of an update, or `None` if unchanged.
    ///
    /// A date wins over a bare time; a bare time moves the current instant
    /// within its wall-clock day.
    fn changed_instant(
        &self,
        current: DateTime<Utc>,
        date: Option<&str>,
        time: Option<&str>,
    ) -> ServiceResult<Option<DateTime<Utc>>> {
        let time = time.map(str::trim).filter(|t| !t.is_empty());
        match (date, time) {
            (Some(date), time) => Ok(Some(parse_submitted(date, time, self.zone)?)),
            (None, Some(time)) => Ok(Some(apply_time_of_day(current, time, self.zone)?)),
            (None, None) => Ok(None),
        }
    }

    /// Upper bound of a list range. A bare date covers the whole day.
    fn range_end(&self, input: &str) -> ServiceResult<DateTime<Utc>> {
        match parse_date_input(input)? {
            DateInput::DateOnly(day) => {
                let next = day.succ_opt().unwrap_or(day).and_time(NaiveTime::MIN);
                Ok(wall_clock_to_utc(next, self.zone) - Duration::milliseconds(1))
            }
            _ => Ok(parse_submitted(input, None, self.zone)?),
        }
    }

    fn row_to_event(&self, row: EventRow) -> Event {
        let start = resolve_instant(row.start_date, row.start_time)
            .unwrap_or_else(|| self.missing_instant(row.id, "start"));
        let end = resolve_instant(row.end_date, row.end_time)
            .unwrap_or_else(|| self.missing_instant(row.id, "end"));

        let event_type = row.event_type.parse().unwrap_or_else(|_| {
            tracing::warn!(event_id = row.id, event_type = %row.event_type, "Unknown stored event type");
            EventType::Other
        });

        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            event_type,
            start,
            end,
            start_date: row.start_date,
            end_date: row.end_date,
            user_id: row.user_id,
            team_id: row.team_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn missing_instant(&self, event_id: i64, side: &str) -> DateTime<Utc> {
        if !self.production {
            tracing::warn!(event_id, side, "Event has neither date nor time, defaulting to now");
        }
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthMethod;
    use crate::storage::{CreateTeamMemberRow, CreateUserRow};
    use chrono::{TimeZone, Timelike};
    use teamcal_core::Role;

    struct Fixture {
        db: Arc<StorageBackend>,
        service: EventService,
        team_id: i64,
        member: AuthUser,
        outsider: AuthUser,
    }

    fn caller(id: i64, role: Role) -> AuthUser {
        AuthUser {
            id,
            employee_number: format!("E{id:05}"),
            name: format!("user-{id}"),
            role,
            auth_method: AuthMethod::Jwt,
        }
    }

    async fn fixture() -> Fixture {
        let db = Arc::new(StorageBackend::in_memory());
        let mut ids = Vec::new();
        for emp in ["M00001", "O00002"] {
            let user = db
                .create_user(CreateUserRow {
                    employee_number: emp.to_string(),
                    name: emp.to_string(),
                    role: "USER".to_string(),
                    status: "APPROVED".to_string(),
                })
                .await
                .unwrap()
                .unwrap();
            ids.push(user.id);
        }
        let team = db.create_team("Design").await.unwrap().unwrap();
        db.add_team_member(CreateTeamMemberRow {
            team_id: team.id,
            user_id: ids[0],
            role: "MEMBER".to_string(),
        })
        .await
        .unwrap();

        let service = EventService::new(db.clone(), LocalZone::from_offset_minutes(540).unwrap(), true);
        Fixture {
            db,
            service,
            team_id: team.id,
            member: caller(ids[0], Role::User),
            outsider: caller(ids[1], Role::User),
        }
    }

    fn request(team_id: i64, start: &str, end: &str) -> CreateEventRequest {
        CreateEventRequest {
            title: "  Sprint review ".to_string(),
            description: None,
            event_type: "meeting".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            start_time: None,
            end_time: None,
            team_id,
        }
    }

    #[tokio::test]
    async fn test_wall_clock_round_trip() {
        let f = fixture().await;
        let created = f
            .service
            .create(&f.member, request(f.team_id, "2025-06-10T09:00", "2025-06-10T18:00"))
            .await
            .unwrap();

        assert_eq!(created.title, "Sprint review");
        assert_eq!(created.event_type, EventType::Meeting);
        assert_eq!(created.start, Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap());
        assert_eq!(created.end, Utc.with_ymd_and_hms(2025, 6, 10, 18, 0, 0).unwrap());

        let fetched = f.service.get(&f.member, created.id).await.unwrap();
        assert_eq!(fetched.start.hour(), 9);
        assert_eq!(fetched.end.hour(), 18);
    }

    #[tokio::test]
    async fn test_legacy_time_combines_with_date_only() {
        let f = fixture().await;
        let mut req = request(f.team_id, "2025-06-10", "2025-06-10");
        req.start_time = Some("09:30".to_string());
        req.end_time = Some("17:00".to_string());

        let created = f.service.create(&f.member, req).await.unwrap();
        assert_eq!(created.start, Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap());
        assert_eq!(created.end, Utc.with_ymd_and_hms(2025, 6, 10, 17, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_start_after_end_is_rejected_before_write() {
        let f = fixture().await;
        let err = f
            .service
            .create(&f.member, request(f.team_id, "2025-06-11T09:00", "2025-06-10T09:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let all = f.db.list_events(EventFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_event_type_and_date_are_rejected() {
        let f = fixture().await;
        let mut req = request(f.team_id, "2025-06-10", "2025-06-10");
        req.event_type = "PARTY".to_string();
        assert!(matches!(
            f.service.create(&f.member, req).await,
            Err(ServiceError::Validation(_))
        ));

        let req = request(f.team_id, "10/06/2025", "2025-06-10");
        assert!(matches!(
            f.service.create(&f.member, req).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_non_member_cannot_create_or_view() {
        let f = fixture().await;
        let err = f
            .service
            .create(&f.outsider, request(f.team_id, "2025-06-10", "2025-06-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let created = f
            .service
            .create(&f.member, request(f.team_id, "2025-06-10", "2025-06-10"))
            .await
            .unwrap();
        assert!(matches!(
            f.service.get(&f.outsider, created.id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_list_uses_exclusive_display_end() {
        let f = fixture().await;
        f.service
            .create(&f.member, request(f.team_id, "2025-06-10T09:00", "2025-06-10T18:00"))
            .await
            .unwrap();

        let events = f
            .service
            .list(
                &f.member,
                ListEventsQuery {
                    team_id: Some(f.team_id),
                    start_date: Some("2025-06-01".to_string()),
                    end_date: Some("2025-06-30".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        // Wall-clock midnight after the start day
        assert_eq!(
            events[0].end,
            Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(
            events[0].end_date,
            Some(Utc.with_ymd_and_hms(2025, 6, 10, 18, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_list_display_end_follows_evening_event() {
        let f = fixture().await;
        f.service
            .create(&f.member, request(f.team_id, "2025-06-10T20:00", "2025-06-10T22:00"))
            .await
            .unwrap();

        let events = f
            .service
            .list(&f.member, ListEventsQuery::default())
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2025, 6, 10, 20, 0, 0).unwrap());
        assert!(events[0].end > events[0].start);
        assert_eq!(events[0].end, Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_list_without_team_covers_callers_teams_only() {
        let f = fixture().await;
        f.service
            .create(&f.member, request(f.team_id, "2025-06-10", "2025-06-10"))
            .await
            .unwrap();

        let mine = f.service.list(&f.member, ListEventsQuery::default()).await.unwrap();
        assert_eq!(mine.len(), 1);

        let theirs = f.service.list(&f.outsider, ListEventsQuery::default()).await.unwrap();
        assert!(theirs.is_empty());

        let err = f
            .service
            .list(
                &f.outsider,
                ListEventsQuery {
                    team_id: Some(f.team_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_time_only_keeps_day() {
        let f = fixture().await;
        let created = f
            .service
            .create(&f.member, request(f.team_id, "2025-06-10T09:00", "2025-06-10T18:00"))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                &f.member,
                created.id,
                UpdateEventRequest {
                    start_time: Some("10:15".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.start, Utc.with_ymd_and_hms(2025, 6, 10, 10, 15, 0).unwrap());
        assert_eq!(updated.end, created.end);
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_span() {
        let f = fixture().await;
        let created = f
            .service
            .create(&f.member, request(f.team_id, "2025-06-10T09:00", "2025-06-10T18:00"))
            .await
            .unwrap();

        let err = f
            .service
            .update(
                &f.member,
                created.id,
                UpdateEventRequest {
                    start_date: Some("2025-06-12".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_only_owner_or_admin_can_delete() {
        let f = fixture().await;
        let created = f
            .service
            .create(&f.member, request(f.team_id, "2025-06-10", "2025-06-10"))
            .await
            .unwrap();

        assert!(matches!(
            f.service.delete(&f.outsider, created.id).await,
            Err(ServiceError::Forbidden(_))
        ));

        let admin = caller(999, Role::Admin);
        f.service.delete(&admin, created.id).await.unwrap();
        assert!(matches!(
            f.service.get(&f.member, created.id).await,
            Err(ServiceError::NotFound("event"))
        ));
    }
}
