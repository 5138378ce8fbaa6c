//! Canonical schema constants for structured logging and events
//!
//! These constants keep rotation logs and run reports consistent.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_DATASET: &str = "dataset";
pub const FIELD_SNAPSHOT: &str = "snapshot";
pub const FIELD_TAG: &str = "tag";

// Rotation outcome
pub const FIELD_CLASS_LABEL: &str = "class_label";
pub const FIELD_CLASS_ORDINAL: &str = "class_ordinal";
pub const FIELD_CONTROL_NUMBER: &str = "control_number";
pub const FIELD_HISTORY_LEN: &str = "history_len";
pub const FIELD_DESTROYED: &str = "destroyed";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_DATASET.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }
}
