//! Rotation schedule scenarios
//!
//! Drives `decide` against an in-test history that applies each decision
//! the way a store would (new generation first, obsolete set removed), and
//! checks the schedule the scheme promises.

use hanoi_core::model::{ClassifiedSnapshot, ControlNumber, SnapshotId};
use hanoi_core::rotation::{decide, next_control_number, ClassTable, RotationState};
use proptest::prelude::*;

struct Schedule {
    table: ClassTable,
    entries: Vec<ClassifiedSnapshot>,
    step: i64,
}

impl Schedule {
    fn new(classes: usize) -> Self {
        Self {
            table: ClassTable::new(classes).unwrap(),
            entries: Vec::new(),
            step: 0,
        }
    }

    fn state(&self) -> RotationState {
        RotationState::new("tank", self.entries.clone())
    }

    /// One rotation; returns the label used
    fn rotate(&mut self) -> char {
        self.step += 1;
        let state = self.state();
        let decision = decide(&state, &self.table);
        let control = next_control_number(state.entries(), self.table.control_modulus());

        self.entries.retain(|e| !decision.obsolete.contains(&e.id));
        self.entries.push(ClassifiedSnapshot {
            id: SnapshotId::new("tank", format!("hanoi-{:06}", self.step)).unwrap(),
            creation: Some(self.step),
            class_label: Some(decision.class.label),
            control_number: Some(control),
        });
        decision.class.label.as_char()
    }

    fn oldest_age(&self) -> i64 {
        let oldest = self.entries.iter().filter_map(|e| e.creation).min().unwrap_or(self.step);
        self.step - oldest + 1
    }
}

#[test]
fn test_five_class_sequence() {
    // Given: a fresh dataset with five classes
    let mut schedule = Schedule::new(5);

    // When: rotating for two full cycles
    let labels: String = (0..33).map(|_| schedule.rotate()).collect();

    // Then: the classic Hanoi pattern, starting at the last class
    assert_eq!(labels, "EABACABADABACABAEABACABADABACABAE");
}

#[test]
fn test_bootstrap_then_first_class() {
    let mut schedule = Schedule::new(5);

    assert_eq!(schedule.rotate(), 'E');
    let state = schedule.state();
    let decision = decide(&state, &schedule.table);

    // E stays, A is filled, nothing is superseded
    assert_eq!(decision.rotation_point, 0);
    assert_eq!(decision.class.label.as_char(), 'A');
    assert!(decision.obsolete.is_empty());
}

#[test]
fn test_control_numbers_cycle() {
    let mut schedule = Schedule::new(3);
    for _ in 0..6 {
        schedule.rotate();
    }

    let state = schedule.state();
    let controls: Vec<u32> = state
        .entries()
        .iter()
        .filter_map(|e| e.control_number.map(ControlNumber::value))
        .collect();

    // modulus 4: steps 6, 5 and 3 survive carrying 1, 0 and 2
    assert_eq!(controls, vec![1, 0, 2]);
}

#[test]
fn test_drift_supersedes_every_wearer() {
    // Given: a history where two snapshots wear "A"
    let table = ClassTable::new(3).unwrap();
    let entries = vec![
        snapshot("hanoi-3", 3, 'B'),
        snapshot("hanoi-2", 2, 'A'),
        snapshot("hanoi-1", 1, 'A'),
    ];

    // When: deciding
    let decision = decide(&RotationState::new("tank", entries), &table);

    // Then: A is reused and both wearers are superseded
    assert_eq!(decision.class.label.as_char(), 'A');
    assert_eq!(decision.obsolete.len(), 2);
}

fn snapshot(tag: &str, creation: i64, label: char) -> ClassifiedSnapshot {
    ClassifiedSnapshot {
        id: SnapshotId::new("tank", tag).unwrap(),
        creation: Some(creation),
        class_label: Some(label.to_string().parse().unwrap()),
        control_number: None,
    }
}

proptest! {
    #[test]
    fn prop_live_count_never_exceeds_class_count(classes in 1usize..=8, rounds in 1usize..200) {
        let mut schedule = Schedule::new(classes);
        for _ in 0..rounds {
            schedule.rotate();
            prop_assert!(schedule.entries.len() <= classes);
        }
    }

    #[test]
    fn prop_horizon_once_steady(classes in 2usize..=8, extra in 1usize..100) {
        let mut schedule = Schedule::new(classes);
        let warmup = 1usize << (classes - 1);
        for _ in 0..warmup {
            schedule.rotate();
        }
        let low = (1i64 << (classes - 2)) + 1;
        let high = 1i64 << (classes - 1);
        for _ in 0..extra {
            schedule.rotate();
            let age = schedule.oldest_age();
            prop_assert!(age >= low && age <= high, "age {} outside {}..={}", age, low, high);
        }
    }
}
