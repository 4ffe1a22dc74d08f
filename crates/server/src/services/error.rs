// Service error taxonomy
// Decision: Flat, status-driven variants; storage failures stay anyhow

use teamcal_core::{LotteryError, ParseEventTypeError, ParseGameTypeError, ScheduleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<ScheduleError> for ServiceError {
    fn from(err: ScheduleError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<LotteryError> for ServiceError {
    fn from(err: LotteryError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ParseEventTypeError> for ServiceError {
    fn from(err: ParseEventTypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ParseGameTypeError> for ServiceError {
    fn from(err: ParseGameTypeError) -> Self {
        Self::Validation(err.to_string())
    }
}
