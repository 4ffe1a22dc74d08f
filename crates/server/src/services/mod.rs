// Services layer for business logic
// Services own business logic and validation, calling storage directly

pub mod error;
pub mod event;
pub mod score;
pub mod team;
pub mod user;

pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use score::{ScoreService, Submission};
pub use team::TeamService;
pub use user::UserService;
