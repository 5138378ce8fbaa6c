use crate::model::{ClassifiedSnapshot, ControlNumber};

/// Control number for the next rotation
///
/// Only the newest entry is consulted. An empty history, or a newest entry
/// whose control number is missing or unparseable, starts a fresh cycle at 0.
pub fn next_control_number(history: &[ClassifiedSnapshot], modulus: u32) -> ControlNumber {
    match history.first().and_then(|newest| newest.control_number) {
        Some(previous) => previous.next(modulus),
        None => ControlNumber::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SnapshotId;

    fn entry(tag: &str, control: Option<u32>) -> ClassifiedSnapshot {
        ClassifiedSnapshot {
            control_number: control.map(ControlNumber::new),
            ..ClassifiedSnapshot::unclassified(SnapshotId::new("tank", tag).unwrap())
        }
    }

    #[test]
    fn test_empty_history_starts_at_zero() {
        assert_eq!(next_control_number(&[], 16), ControlNumber::ZERO);
        assert_eq!(next_control_number(&[], 1), ControlNumber::ZERO);
    }

    #[test]
    fn test_advances_from_newest_only() {
        let history = vec![entry("hanoi-3", Some(3)), entry("hanoi-2", Some(9))];
        assert_eq!(next_control_number(&history, 16), ControlNumber::new(4));
    }

    #[test]
    fn test_wraps_at_modulus() {
        let history = vec![entry("hanoi-1", Some(15))];
        assert_eq!(next_control_number(&history, 16), ControlNumber::ZERO);
    }

    #[test]
    fn test_unparseable_newest_resets() {
        // the projector turns "X" into None
        let history = vec![entry("hanoi-2", None), entry("hanoi-1", Some(5))];
        assert_eq!(next_control_number(&history, 16), ControlNumber::ZERO);
    }
}
