// Input validation for calendar and leaderboard APIs
//
// Hard limits, not configurable. Messages name the first failing field.

use crate::services::{ServiceError, ServiceResult};

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum length of an event title, in characters.
pub const MAX_EVENT_TITLE_CHARS: usize = 200;

/// Maximum length of an event description, in characters.
pub const MAX_EVENT_DESCRIPTION_CHARS: usize = 5000;

/// Maximum serialized size of score metadata.
/// 16 KB is plenty for per-game statistics.
pub const MAX_SCORE_METADATA_BYTES: usize = 16 * 1024; // 16 KB

// =============================================================================
// Validation Functions
// =============================================================================

pub fn validate_event_title(title: &str) -> ServiceResult<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::validation("title is required"));
    }
    if title.chars().count() > MAX_EVENT_TITLE_CHARS {
        return Err(ServiceError::validation(format!(
            "title must be at most {MAX_EVENT_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_event_description(description: Option<&str>) -> ServiceResult<()> {
    if let Some(desc) = description {
        if desc.chars().count() > MAX_EVENT_DESCRIPTION_CHARS {
            return Err(ServiceError::validation(format!(
                "description must be at most {MAX_EVENT_DESCRIPTION_CHARS} characters"
            )));
        }
    }
    Ok(())
}

/// Validate all fields for CreateEventRequest
pub fn validate_create_event_input(title: &str, description: Option<&str>) -> ServiceResult<()> {
    validate_event_title(title)?;
    validate_event_description(description)?;
    Ok(())
}

/// Validate all provided fields for UpdateEventRequest
pub fn validate_update_event_input(
    title: Option<&str>,
    description: Option<&str>,
) -> ServiceResult<()> {
    if let Some(title) = title {
        validate_event_title(title)?;
    }
    validate_event_description(description)?;
    Ok(())
}

pub fn validate_score(score: f64) -> ServiceResult<()> {
    if !score.is_finite() {
        return Err(ServiceError::validation("score must be a finite number"));
    }
    if score < 0.0 {
        return Err(ServiceError::validation("score must not be negative"));
    }
    Ok(())
}

pub fn validate_metadata(metadata: Option<&serde_json::Value>) -> ServiceResult<()> {
    let Some(value) = metadata else {
        return Ok(());
    };
    let size = serde_json::to_vec(value)
        .map_err(|e| ServiceError::Internal(e.into()))?
        .len();
    if size > MAX_SCORE_METADATA_BYTES {
        tracing::warn!(
            "Score metadata exceeds limit: {} bytes (max: {})",
            size,
            MAX_SCORE_METADATA_BYTES
        );
        return Err(ServiceError::validation(format!(
            "metadata must be at most {MAX_SCORE_METADATA_BYTES} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_rules() {
        assert!(validate_event_title("Offsite").is_ok());
        assert!(validate_event_title(&"가".repeat(MAX_EVENT_TITLE_CHARS)).is_ok());
        assert!(validate_event_title("   ").is_err());
        assert!(validate_event_title(&"x".repeat(MAX_EVENT_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let err = validate_create_event_input("", Some(&"x".repeat(10_000))).unwrap_err();
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn test_update_skips_absent_fields() {
        assert!(validate_update_event_input(None, None).is_ok());
        assert!(validate_update_event_input(Some(""), None).is_err());
        assert!(validate_update_event_input(
            None,
            Some(&"x".repeat(MAX_EVENT_DESCRIPTION_CHARS + 1))
        )
        .is_err());
    }

    #[test]
    fn test_score_rules() {
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(1234.5).is_ok());
        assert!(validate_score(-0.1).is_err());
        assert!(validate_score(f64::NAN).is_err());
        assert!(validate_score(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_metadata_size() {
        assert!(validate_metadata(None).is_ok());
        assert!(validate_metadata(Some(&json!({"wins": 3}))).is_ok());
        let big = json!({ "blob": "x".repeat(MAX_SCORE_METADATA_BYTES) });
        assert!(validate_metadata(Some(&big)).is_err());
    }
}
