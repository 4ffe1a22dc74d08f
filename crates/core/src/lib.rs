// Teamcal core
//
// DB-agnostic domain types and the pure logic behind the team calendar:
// - schedule: legacy date/time reconciliation, wall-clock parsing, display end
// - ranking: per-game ordering policy and rank assembly
// - lottery: lunch lottery picker
//
// Storage and HTTP live in teamcal-server.

// Telemetry (tracing subscriber setup)
pub mod telemetry;

// Domain entity types
pub mod event;
pub mod game;
pub mod team;
pub mod user;

pub mod lottery;
pub mod ranking;
pub mod schedule;

// Re-exports for convenience
pub use event::{Event, EventType, ParseEventTypeError};
pub use game::{GameScore, GameType, ParseGameTypeError, SortOrder};
pub use lottery::{draw, LotteryError};
pub use ranking::{ScoreEntry, RankedScore};
pub use schedule::{LocalZone, ScheduleError};
pub use team::{Team, TeamMember, TeamRole};
pub use user::{ApprovalStatus, Role, User};
