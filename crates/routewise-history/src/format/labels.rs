//! Fixed enum → label tables.

use crate::text::{capitalize, humanize_enum};

const STATUS_LABELS: &[(&str, &str)] = &[
    ("ACTIVE", "Active"),
    ("INACTIVE", "Inactive"),
    ("PENDING", "Pending"),
    ("APPROVED", "Approved"),
    ("REJECTED", "Rejected"),
    ("COMPLETED", "Completed"),
    ("IN_PROGRESS", "In Progress"),
    ("NOT_STARTED", "Not Started"),
    ("EXPIRED", "Expired"),
    ("SUSPENDED", "Suspended"),
    ("CANCELLED", "Cancelled"),
    ("SUBMITTED", "Submitted"),
    ("UNDER_REVIEW", "Under Review"),
];

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("DBS_CERTIFICATE", "DBS Certificate"),
    ("DRIVING_LICENCE", "Driving Licence"),
    ("INSURANCE", "Insurance Certificate"),
    ("MOT", "MOT Certificate"),
    ("TAXI_BADGE", "Taxi Badge"),
    ("PROOF_OF_ADDRESS", "Proof of Address"),
    ("TRAINING_CERTIFICATE", "Training Certificate"),
    ("V5C", "V5C Logbook"),
];

const VEHICLE_TYPES: &[(&str, &str)] = &[
    ("SALOON", "Saloon"),
    ("ESTATE", "Estate"),
    ("MPV", "MPV"),
    ("MINIBUS", "Minibus"),
    ("WAV", "Wheelchair Accessible Vehicle"),
    ("COACH", "Coach"),
];

const TIMES_OF_DAY: &[(&str, &str)] = &[
    ("AM", "Morning"),
    ("MORNING", "Morning"),
    ("PM", "Afternoon"),
    ("AFTERNOON", "Afternoon"),
    ("BOTH", "Morning & Afternoon"),
    ("AM_PM", "Morning & Afternoon"),
    ("FULL_DAY", "Morning & Afternoon"),
];

/// Week order for per-day tables.
pub const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

fn lookup(table: &[(&str, &'static str)], raw: &str) -> Option<&'static str> {
    let key = raw.trim().to_uppercase().replace([' ', '-'], "_");
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// `FIRST_AID` → `First Aid`.
pub fn title_enum(raw: &str) -> String {
    raw.trim()
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Known statuses map to their label; anything else is humanized
/// (`ON_HOLD` → `on hold`).
pub fn status_label(raw: &str) -> String {
    lookup(STATUS_LABELS, raw)
        .map(str::to_string)
        .unwrap_or_else(|| humanize_enum(raw))
}

/// Document type label.
pub fn document_type_label(raw: &str) -> String {
    lookup(DOCUMENT_TYPES, raw)
        .map(str::to_string)
        .unwrap_or_else(|| title_enum(raw))
}

/// Vehicle type label.
pub fn vehicle_type_label(raw: &str) -> String {
    lookup(VEHICLE_TYPES, raw)
        .map(str::to_string)
        .unwrap_or_else(|| title_enum(raw))
}

/// Time-of-day label for temporary assignments.
pub fn time_of_day_label(raw: &str) -> String {
    lookup(TIMES_OF_DAY, raw)
        .map(str::to_string)
        .unwrap_or_else(|| title_enum(raw))
}

/// Whether `raw` names a day of the week.
pub fn is_weekday(raw: &str) -> bool {
    WEEKDAYS.contains(&raw.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label("ACTIVE"), "Active");
        assert_eq!(status_label("in_progress"), "In Progress");
        assert_eq!(status_label("ON_HOLD"), "on hold");
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(document_type_label("DBS_CERTIFICATE"), "DBS Certificate");
        assert_eq!(document_type_label("FIRST_AID"), "First Aid");
        assert_eq!(vehicle_type_label("wav"), "Wheelchair Accessible Vehicle");
        assert_eq!(time_of_day_label("pm"), "Afternoon");
        assert_eq!(time_of_day_label("EVENING"), "Evening");
    }

    #[test]
    fn test_weekdays() {
        assert!(is_weekday("MONDAY"));
        assert!(!is_weekday("holiday"));
    }
}
