//! Single-pass aggregations the dashboard views render. All functions here
//! operate on already-fetched rows and never touch the database.

use crate::db::models::{Anomaly, AttendanceEvent, PersonRecord, PresenceStatus, Severity};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Active anomalies partitioned by severity tier. The partition is total and
/// disjoint: every input row lands in exactly one bucket.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SeverityBuckets {
    pub critical: Vec<Anomaly>,
    pub warning: Vec<Anomaly>,
    pub watchlist: Vec<Anomaly>,
}

impl SeverityBuckets {
    /// Alert count shown on the action queue: watchlist rows are
    /// informational and do not count as alerts.
    pub fn active_alert_count(&self) -> usize {
        self.critical.len() + self.warning.len()
    }

    pub fn total(&self) -> usize {
        self.critical.len() + self.warning.len() + self.watchlist.len()
    }
}

/// Partition anomalies into severity buckets
pub fn partition_by_severity(anomalies: &[Anomaly]) -> SeverityBuckets {
    let mut buckets = SeverityBuckets::default();
    for anomaly in anomalies {
        match anomaly.severity {
            Severity::Critical => buckets.critical.push(anomaly.clone()),
            Severity::Warning => buckets.warning.push(anomaly.clone()),
            Severity::Watchlist => buckets.watchlist.push(anomaly.clone()),
        }
    }
    buckets
}

/// Tallies for the presence header cards
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct PresenceCounts {
    pub on_campus: usize,
    pub off_campus: usize,
    pub unknown: usize,
}

/// Count active people by presence state
pub fn presence_counts(persons: &[PersonRecord]) -> PresenceCounts {
    let mut counts = PresenceCounts::default();
    for person in persons.iter().filter(|p| p.is_active) {
        match person.presence {
            PresenceStatus::OnCampus => counts.on_campus += 1,
            PresenceStatus::OffCampus => counts.off_campus += 1,
            PresenceStatus::Unknown => counts.unknown += 1,
        }
    }
    counts
}

/// Reduce movement events to the latest event per person, grouped by
/// location. Events without a location are grouped under "Unknown". Input is
/// expected newest-first (the repository orders by occurred_at DESC); later
/// rows for an already-seen person are ignored.
pub fn occupancy_by_location(events: &[AttendanceEvent]) -> BTreeMap<String, Vec<String>> {
    let mut seen = HashSet::new();
    let mut occupancy: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for event in events {
        let Some(person_id) = event.person_id else {
            continue;
        };
        if !seen.insert(person_id) {
            continue;
        }

        let location = event
            .location
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let name = event
            .person_name
            .clone()
            .unwrap_or_else(|| person_id.to_string());
        occupancy.entry(location).or_default().push(name);
    }

    occupancy
}

/// Absenteeism rate as a percentage, with a zero-denominator guard.
pub fn absenteeism_rate(absent_days: u32, total_days: u32) -> f64 {
    if total_days == 0 {
        return 0.0;
    }
    (absent_days as f64 / total_days as f64) * 100.0
}

/// A student is chronically absent at or above 10% missed days.
pub const CHRONIC_ABSENTEEISM_THRESHOLD: f64 = 10.0;

pub fn is_chronically_absent(absent_days: u32, total_days: u32) -> bool {
    absenteeism_rate(absent_days, total_days) >= CHRONIC_ABSENTEEISM_THRESHOLD
}

/// One person's attendance over a window of school days
#[derive(Debug, Clone, Serialize)]
pub struct AbsenteeismRecord {
    pub person_id: Uuid,
    pub full_name: String,
    pub absent_days: u32,
    pub total_days: u32,
    pub rate: f64,
}

/// Summarize a person's window. A calendar day counts as present when at
/// least one event was recorded on it; repeated events on the same day do
/// not inflate the count.
pub fn absenteeism_record(
    person: &PersonRecord,
    events: &[AttendanceEvent],
    total_days: u32,
) -> AbsenteeismRecord {
    let present: HashSet<NaiveDate> = events.iter().map(|e| e.occurred_at.date_naive()).collect();
    let absent_days = total_days.saturating_sub(present.len() as u32);

    AbsenteeismRecord {
        person_id: person.id,
        full_name: person.full_name.clone(),
        absent_days,
        total_days,
        rate: absenteeism_rate(absent_days, total_days),
    }
}

/// Records at or above the chronic threshold, worst first
pub fn chronic_absentees(records: &[AbsenteeismRecord]) -> Vec<AbsenteeismRecord> {
    let mut chronic: Vec<AbsenteeismRecord> = records
        .iter()
        .filter(|r| is_chronically_absent(r.absent_days, r.total_days))
        .cloned()
        .collect();

    chronic.sort_by(|a, b| b.rate.partial_cmp(&a.rate).unwrap_or(std::cmp::Ordering::Equal));
    chronic
}

/// View kinds with documented empty-state copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    Requests,
    Cameras,
    Anomalies,
    Movements,
    Visitors,
    Students,
}

/// The string a view renders in place of an empty result set; empty results
/// are never an error.
pub fn empty_state(kind: EmptyState) -> &'static str {
    match kind {
        EmptyState::Requests => "No requests found",
        EmptyState::Cameras => "No cameras configured yet",
        EmptyState::Anomalies => "No active anomalies",
        EmptyState::Movements => "No movement events recorded",
        EmptyState::Visitors => "No visitors registered",
        EmptyState::Students => "No students found",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AnomalyStatus, AttendanceEventType, PersonRole};
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn anomaly(severity: Severity) -> Anomaly {
        Anomaly {
            id: Uuid::new_v4(),
            person_id: None,
            severity,
            status: AnomalyStatus::Active,
            location: None,
            expected_location: None,
            description: "out of expected zone".to_string(),
            detected_at: Utc::now(),
            intervention_count: 0,
            last_intervention_at: None,
            resolved_by: None,
            resolved_at: None,
            created_at: Utc::now(),
        }
    }

    fn person(presence: PresenceStatus, is_active: bool) -> PersonRecord {
        PersonRecord {
            id: Uuid::new_v4(),
            person_code: "P-001".to_string(),
            full_name: "Test Person".to_string(),
            class_name: None,
            role: PersonRole::Student,
            presence,
            risk_score: None,
            risk_notes: None,
            photo_url: None,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn movement(person_id: Uuid, name: &str, location: Option<&str>) -> AttendanceEvent {
        AttendanceEvent {
            id: Uuid::new_v4(),
            person_id: Some(person_id),
            person_name: Some(name.to_string()),
            event_type: AttendanceEventType::Entry,
            occurred_at: Utc::now(),
            camera_id: None,
            location: location.map(str::to_string),
            confidence: Some(0.9),
            confirmed: true,
            created_at: Utc::now(),
        }
    }

    fn movement_at(person_id: Uuid, occurred_at: DateTime<Utc>) -> AttendanceEvent {
        AttendanceEvent {
            occurred_at,
            ..movement(person_id, "Student", None)
        }
    }

    #[test]
    fn severity_partition_is_total_and_disjoint() {
        let anomalies = vec![
            anomaly(Severity::Critical),
            anomaly(Severity::Warning),
            anomaly(Severity::Watchlist),
            anomaly(Severity::Warning),
            anomaly(Severity::Critical),
        ];

        let buckets = partition_by_severity(&anomalies);

        assert_eq!(buckets.critical.len(), 2);
        assert_eq!(buckets.warning.len(), 2);
        assert_eq!(buckets.watchlist.len(), 1);
        assert_eq!(buckets.total(), anomalies.len());

        // No row appears in more than one bucket
        let mut ids: Vec<_> = buckets
            .critical
            .iter()
            .chain(&buckets.warning)
            .chain(&buckets.watchlist)
            .map(|a| a.id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), anomalies.len());
    }

    #[test]
    fn active_alert_count_excludes_watchlist() {
        let anomalies = vec![
            anomaly(Severity::Critical),
            anomaly(Severity::Warning),
            anomaly(Severity::Warning),
            anomaly(Severity::Watchlist),
        ];

        let buckets = partition_by_severity(&anomalies);

        assert_eq!(
            buckets.active_alert_count(),
            buckets.critical.len() + buckets.warning.len()
        );
        assert_eq!(buckets.active_alert_count(), 3);
    }

    #[test]
    fn empty_anomaly_set_produces_empty_buckets() {
        let buckets = partition_by_severity(&[]);
        assert_eq!(buckets.total(), 0);
        assert_eq!(buckets.active_alert_count(), 0);
    }

    #[test]
    fn presence_counts_skip_inactive_records() {
        let persons = vec![
            person(PresenceStatus::OnCampus, true),
            person(PresenceStatus::OnCampus, true),
            person(PresenceStatus::OffCampus, true),
            person(PresenceStatus::Unknown, true),
            person(PresenceStatus::OnCampus, false),
        ];

        let counts = presence_counts(&persons);

        assert_eq!(
            counts,
            PresenceCounts {
                on_campus: 2,
                off_campus: 1,
                unknown: 1,
            }
        );
    }

    #[test]
    fn occupancy_uses_latest_event_per_person() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        // Newest first, as the repository returns them
        let events = vec![
            movement(alice, "Alice", Some("Library")),
            movement(bob, "Bob", Some("Gym")),
            movement(alice, "Alice", Some("Cafeteria")),
        ];

        let occupancy = occupancy_by_location(&events);

        assert_eq!(occupancy["Library"], vec!["Alice".to_string()]);
        assert_eq!(occupancy["Gym"], vec!["Bob".to_string()]);
        assert!(!occupancy.contains_key("Cafeteria"));
    }

    #[test]
    fn occupancy_groups_missing_location_under_unknown() {
        let carol = Uuid::new_v4();
        let events = vec![movement(carol, "Carol", None)];

        let occupancy = occupancy_by_location(&events);

        assert_eq!(occupancy["Unknown"], vec!["Carol".to_string()]);
    }

    #[test]
    fn absenteeism_rate_guards_zero_denominator() {
        assert_eq!(absenteeism_rate(3, 0), 0.0);
        assert_eq!(absenteeism_rate(0, 20), 0.0);
        assert_eq!(absenteeism_rate(5, 20), 25.0);
    }

    #[test]
    fn chronic_absentee_threshold() {
        assert!(is_chronically_absent(2, 20)); // 10%
        assert!(!is_chronically_absent(1, 20)); // 5%
    }

    #[test]
    fn absenteeism_record_counts_distinct_present_days() {
        let subject = person(PresenceStatus::Unknown, true);
        let events = vec![
            movement_at(subject.id, Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap()),
            movement_at(subject.id, Utc.with_ymd_and_hms(2024, 9, 2, 15, 30, 0).unwrap()),
            movement_at(subject.id, Utc.with_ymd_and_hms(2024, 9, 3, 8, 5, 0).unwrap()),
        ];

        let record = absenteeism_record(&subject, &events, 20);

        assert_eq!(record.absent_days, 18);
        assert_eq!(record.total_days, 20);
        assert_eq!(record.rate, 90.0);
    }

    #[test]
    fn absenteeism_record_with_no_events_is_fully_absent() {
        let subject = person(PresenceStatus::Unknown, true);

        let record = absenteeism_record(&subject, &[], 20);

        assert_eq!(record.absent_days, 20);
        assert_eq!(record.rate, 100.0);
    }

    #[test]
    fn chronic_absentees_keeps_threshold_breaches_worst_first() {
        let make = |name: &str, absent: u32| AbsenteeismRecord {
            person_id: Uuid::new_v4(),
            full_name: name.to_string(),
            absent_days: absent,
            total_days: 20,
            rate: absenteeism_rate(absent, 20),
        };

        // 5% stays below the threshold, 10% and 25% are chronic
        let records = vec![make("Low", 1), make("High", 5), make("Edge", 2)];

        let chronic = chronic_absentees(&records);

        let names: Vec<_> = chronic.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["High", "Edge"]);
    }

    #[test]
    fn empty_state_strings_match_views() {
        assert_eq!(empty_state(EmptyState::Requests), "No requests found");
        assert_eq!(empty_state(EmptyState::Cameras), "No cameras configured yet");
    }
}
