// Event date reconciliation
//
// Stored events carry up to four instants: startDate/endDate and the legacy
// startTime/endTime columns. Older rows put the calendar date in startDate at
// midnight and the time of day in startTime; newer rows only use startDate.
//
// Client-submitted dates are wall-clock readings. They are stored so that the
// UTC fields of the instant equal the submitted wall-clock fields (see
// `wall_clock_to_utc`). Reads must use the same convention to round-trip.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    Utc,
};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];
const TIME_FORMAT: &str = "%H:%M";

/// Errors produced while parsing or validating event dates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid date '{0}', expected YYYY-MM-DD, YYYY-MM-DDTHH:mm or YYYY-MM-DD HH:mm")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HH:mm")]
    InvalidTime(String),

    #[error("start must not be after end")]
    StartAfterEnd,
}

/// The server's local zone, as a fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalZone(FixedOffset);

impl LocalZone {
    pub fn new(offset: FixedOffset) -> Self {
        Self(offset)
    }

    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    /// Offset in minutes east of UTC (KST is 540)
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self)
    }

    /// Current offset of the host's local zone
    pub fn host() -> Self {
        Self(Local::now().offset().fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Offset in the browser `getTimezoneOffset` convention: minutes of `UTC - local`.
    pub fn timezone_offset_minutes(&self) -> i64 {
        -i64::from(self.0.local_minus_utc()) / 60
    }

    /// The instant at which the given local wall-clock reading occurs.
    pub fn local_instant(&self, wall: NaiveDateTime) -> DateTime<Utc> {
        (wall - Duration::seconds(i64::from(self.0.local_minus_utc()))).and_utc()
    }
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::host()
    }
}

/// Convert a submitted wall-clock reading into the stored instant.
///
/// The reading is first placed in the local zone, then shifted by the
/// `getTimezoneOffset` minutes. The result has UTC fields equal to the
/// wall-clock fields regardless of the zone. Existing rows were written this
/// way, so both the write and the read side must keep using it.
pub fn wall_clock_to_utc(wall: NaiveDateTime, zone: LocalZone) -> DateTime<Utc> {
    let local = zone.local_instant(wall);
    local - Duration::minutes(zone.timezone_offset_minutes())
}

/// Inverse of [`wall_clock_to_utc`].
pub fn utc_to_wall_clock(instant: DateTime<Utc>, zone: LocalZone) -> NaiveDateTime {
    let local = instant + Duration::minutes(zone.timezone_offset_minutes());
    local.naive_utc() + Duration::seconds(i64::from(zone.offset().local_minus_utc()))
}

/// A parsed `startDate`/`endDate` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// `YYYY-MM-DD`
    DateOnly(NaiveDate),
    /// `YYYY-MM-DDTHH:mm` or `YYYY-MM-DD HH:mm`
    WallClock(NaiveDateTime),
    /// Full RFC 3339 timestamp, already an instant
    Instant(DateTime<Utc>),
}

pub fn parse_date_input(input: &str) -> Result<DateInput, ScheduleError> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(DateInput::DateOnly(date));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(wall) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(DateInput::WallClock(wall));
        }
    }

    DateTime::parse_from_rfc3339(input)
        .map(|instant| DateInput::Instant(instant.with_timezone(&Utc)))
        .map_err(|_| ScheduleError::InvalidDate(input.to_string()))
}

pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, ScheduleError> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, TIME_FORMAT)
        .map_err(|_| ScheduleError::InvalidTime(input.to_string()))
}

/// Parse a submitted date plus an optional legacy `HH:mm` time into the stored instant.
///
/// The legacy time only applies to date-only input.
pub fn parse_submitted(
    date: &str,
    legacy_time: Option<&str>,
    zone: LocalZone,
) -> Result<DateTime<Utc>, ScheduleError> {
    match parse_date_input(date)? {
        DateInput::DateOnly(day) => {
            let time = match legacy_time.map(str::trim).filter(|t| !t.is_empty()) {
                Some(t) => parse_time_of_day(t)?,
                None => NaiveTime::MIN,
            };
            Ok(wall_clock_to_utc(day.and_time(time), zone))
        }
        DateInput::WallClock(wall) => Ok(wall_clock_to_utc(wall, zone)),
        DateInput::Instant(instant) => Ok(instant),
    }
}

/// Replace the time of day of an existing stored instant with a legacy `HH:mm` value.
pub fn apply_time_of_day(
    instant: DateTime<Utc>,
    time: &str,
    zone: LocalZone,
) -> Result<DateTime<Utc>, ScheduleError> {
    let time = parse_time_of_day(time)?;
    let day = utc_to_wall_clock(instant, zone).date();
    Ok(wall_clock_to_utc(day.and_time(time), zone))
}

fn is_midnight(instant: DateTime<Utc>) -> bool {
    instant.time() == NaiveTime::MIN
}

/// Reconcile a date column with its legacy time column.
///
/// `date` wins when present. A midnight `date` paired with a non-midnight
/// `time` takes its time of day from `time`.
pub fn resolve_instant(
    date: Option<DateTime<Utc>>,
    time: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (date, time) {
        (Some(date), Some(time)) if is_midnight(date) && !is_midnight(time) => {
            Some(date.date_naive().and_time(time.time()).and_utc())
        }
        (Some(date), _) => Some(date),
        (None, time) => time,
    }
}

pub fn validate_span(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ScheduleError> {
    if start > end {
        return Err(ScheduleError::StartAfterEnd);
    }
    Ok(())
}

/// UTC calendar day as `year * 10000 + month * 100 + day`
pub fn calendar_day_key(instant: DateTime<Utc>) -> i32 {
    instant.year() * 10000 + instant.month() as i32 * 100 + instant.day() as i32
}

/// Exclusive end for calendar widgets.
///
/// Same-day events end at wall-clock midnight after the start day; multi-day
/// events end at wall-clock midnight after the end day. The boundary goes
/// through [`wall_clock_to_utc`] like every other stored instant, so it never
/// lands before `start`. Presentation only, never stored.
pub fn display_end(start: DateTime<Utc>, end: DateTime<Utc>, zone: LocalZone) -> DateTime<Utc> {
    let last_day = if calendar_day_key(start) == calendar_day_key(end) {
        start.date_naive()
    } else {
        end.date_naive()
    };
    let next_day = last_day.succ_opt().unwrap_or(last_day);
    wall_clock_to_utc(next_day.and_time(NaiveTime::MIN), zone)
}
