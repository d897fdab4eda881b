//! # Field Category Classifier
//!
//! The audit log has no schema, so what a field *is* has to be inferred from
//! its name. Every name-based heuristic in the crate lives here, in
//! [`classify`], which turns a field path into a [`FieldProfile`]. The
//! formatter, filter and presenter consult the profile and never look at the
//! raw path for keywords themselves; replacing this module with a real
//! per-entity schema changes nothing downstream.
//!
//! Compound categories are matched against the *key* of a path: its last
//! segment, skipping embedded identifiers and the `new` sentinel (so
//! `trainings.65a1…f6` is keyed by `trainings`, `address.postcode` by
//! `postcode`). Flag heuristics (reference, status, date, empty message)
//! match anywhere in the path.

use routewise_core::is_embedded_identifier;

use crate::dictionary::NEW_ITEM_SEGMENT;
use crate::text::split_words;

/// Value shapes with a dedicated domain formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundCategory {
    /// Composite route-assignment of a stand-in driver.
    TemporaryDriver,
    /// Emergency contact person.
    EmergencyContact,
    /// Ad-hoc special service on a route.
    SpecialService,
    /// Special-care need object or list.
    SpecialCareNeeds,
    /// Uploaded document metadata.
    Document,
    /// Vehicle details.
    Vehicle,
    /// Training record.
    Training,
    /// School holiday list.
    SchoolHolidays,
    /// School operating hours.
    OperatingHours,
    /// Relationship enum (`MOTHER`, `GUARDIAN`).
    Relationship,
    /// Parent array.
    Parents,
    /// Postal address.
    Address,
    /// Day-wise student membership on a route.
    DayWiseStudent,
    /// Route stop.
    Stop,
    /// Monetary amount.
    Price,
}

/// Route records whose add/remove nature matters more than their text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralCategory {
    /// Special service added, changed or removed.
    SpecialService,
    /// Stop added, removed or moved.
    Stop,
    /// Student added to or removed from a day.
    DayWiseStudent,
}

/// Everything the pipeline infers from a field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldProfile {
    /// Domain formatter category, if any.
    pub compound: Option<CompoundCategory>,
    /// Structural route category, if any.
    pub structural: Option<StructuralCategory>,
    /// Refers to another entity (driver, PA, vendor).
    pub is_reference: bool,
    /// The `isActive` flag.
    pub is_active_flag: bool,
    /// A status enum.
    pub is_status: bool,
    /// Holds a date or time.
    pub is_temporal: bool,
    /// Temporary-assignment bookkeeping.
    pub is_temporary: bool,
    /// File-pipeline housekeeping event.
    pub is_bookkeeping: bool,
    /// Derived stop resequencing event.
    pub is_stop_sequence: bool,
    /// Explicit stop addition/removal.
    pub is_stop_membership: bool,
    /// Message shown when the value is empty.
    pub empty_message: &'static str,
}

/// Generic empty-value message.
pub const DEFAULT_EMPTY_MESSAGE: &str = "Not provided";

/// Field recorded when stops are renumbered after an explicit edit.
pub const STOP_SEQUENCE_SENTINEL: &str = "Stop Sequence Updated";

/// Fields recorded for explicit stop edits.
pub const STOP_MEMBERSHIP_FIELDS: &[&str] = &["Stop Added", "Stop Removed"];

/// Internal file-upload bookkeeping fields.
pub const BOOKKEEPING_FIELDS: &[&str] =
    &["trainings.fileUpload", "trainings.fileProcessed", "trainings.file"];

const DATE_KEYWORDS: &[&str] = &[
    "date",
    "time",
    "expiry",
    "uploadedat",
    "updatedat",
    "createdat",
    "assignedat",
];

/// First match wins; more specific keywords come first.
const EMPTY_MESSAGES: &[(&str, &str)] = &[
    ("email", "No email address"),
    ("phone", "No phone number"),
    ("mobile", "No phone number"),
    ("postcode", "No postcode"),
    ("address", "No address provided"),
    ("note", "No notes"),
    ("description", "No description"),
    ("vehicle", "No vehicle details"),
    ("driver", "No driver assigned"),
    ("vendor", "No vendor assigned"),
    ("school", "No school assigned"),
    ("parent", "No parent details"),
    ("document", "No document uploaded"),
    ("training", "No training recorded"),
    ("holiday", "No holidays"),
    ("price", "No price set"),
    ("date", "No date set"),
    ("name", "No name provided"),
];

/// Matched against the key, first match wins. `temporarydriver` must beat
/// plain driver references, `relationship` must beat `parent`.
const COMPOUND_KEYWORDS: &[(&str, CompoundCategory)] = &[
    ("temporarydriver", CompoundCategory::TemporaryDriver),
    ("emergencycontact", CompoundCategory::EmergencyContact),
    ("specialservice", CompoundCategory::SpecialService),
    ("specialcare", CompoundCategory::SpecialCareNeeds),
    ("specialneeds", CompoundCategory::SpecialCareNeeds),
    ("careneeds", CompoundCategory::SpecialCareNeeds),
    ("document", CompoundCategory::Document),
    ("vehicle", CompoundCategory::Vehicle),
    ("training", CompoundCategory::Training),
    ("holiday", CompoundCategory::SchoolHolidays),
    ("operatinghours", CompoundCategory::OperatingHours),
    ("relationship", CompoundCategory::Relationship),
    ("parent", CompoundCategory::Parents),
    ("address", CompoundCategory::Address),
    ("price", CompoundCategory::Price),
];

/// Keys containing the second element never take the category: an
/// `emailAddress` is not a postal address.
const COMPOUND_EXCLUSIONS: &[(CompoundCategory, &str)] = &[(CompoundCategory::Address, "email")];

fn compound_excluded(key: &str, category: CompoundCategory) -> bool {
    COMPOUND_EXCLUSIONS
        .iter()
        .any(|(excluded, kw)| *excluded == category && key.contains(kw))
}

/// Containers whose sub-keys are free-form (days, periods), so the whole
/// path is searched when the key itself matched nothing.
const CONTAINER_CATEGORIES: &[CompoundCategory] = &[
    CompoundCategory::TemporaryDriver,
    CompoundCategory::SpecialService,
    CompoundCategory::SchoolHolidays,
    CompoundCategory::OperatingHours,
];

/// Lower-case, with spaces, hyphens and underscores removed.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Last segment that is neither an embedded identifier nor `new`.
fn key_segment(path: &str) -> &str {
    path.rsplit('.')
        .find(|seg| !seg.is_empty() && *seg != NEW_ITEM_SEGMENT && !is_embedded_identifier(seg))
        .unwrap_or(path)
}

fn compound_for(path: &str) -> Option<CompoundCategory> {
    let key = squash(key_segment(path));
    if let Some((_, category)) = COMPOUND_KEYWORDS
        .iter()
        .find(|(kw, category)| key.contains(kw) && !compound_excluded(&key, *category))
    {
        return Some(*category);
    }
    let whole = squash(path);
    COMPOUND_KEYWORDS
        .iter()
        .filter(|(_, category)| CONTAINER_CATEGORIES.contains(category))
        .find(|(kw, _)| whole.contains(kw))
        .map(|(_, category)| *category)
}

fn structural_for(path: &str) -> Option<StructuralCategory> {
    let lower = path.trim().to_lowercase();
    let squashed = squash(path);
    if squashed.contains("specialservice") {
        Some(StructuralCategory::SpecialService)
    } else if lower.starts_with("day-wise student") || squashed.starts_with("daywisestudent") {
        Some(StructuralCategory::DayWiseStudent)
    } else if lower.contains("stop") {
        Some(StructuralCategory::Stop)
    } else {
        None
    }
}

/// Any camelCase word in any segment is exactly `pa`.
fn has_pa_word(path: &str) -> bool {
    path.split('.')
        .flat_map(split_words)
        .any(|w| w.eq_ignore_ascii_case("pa"))
}

/// Classify a field path.
pub fn classify(path: &str) -> FieldProfile {
    let lower = path.to_lowercase();
    let squashed = squash(path);
    let structural = structural_for(path);

    let compound = match structural {
        Some(StructuralCategory::DayWiseStudent) => Some(CompoundCategory::DayWiseStudent),
        Some(StructuralCategory::Stop) if !lower.contains("sequence") => Some(CompoundCategory::Stop),
        _ => compound_for(path),
    };

    let empty_message = EMPTY_MESSAGES
        .iter()
        .find(|(kw, _)| squashed.contains(kw))
        .map(|(_, msg)| *msg)
        .unwrap_or(DEFAULT_EMPTY_MESSAGE);

    FieldProfile {
        compound,
        structural,
        is_reference: lower.contains("driver") || lower.contains("vendor") || has_pa_word(path),
        is_active_flag: key_segment(path).eq_ignore_ascii_case("isactive"),
        is_status: lower.contains("status"),
        is_temporal: DATE_KEYWORDS.iter().any(|kw| squashed.contains(kw)),
        is_temporary: lower.contains("temporary"),
        is_bookkeeping: BOOKKEEPING_FIELDS.contains(&path),
        is_stop_sequence: path.trim().eq_ignore_ascii_case(STOP_SEQUENCE_SENTINEL),
        is_stop_membership: STOP_MEMBERSHIP_FIELDS
            .iter()
            .any(|f| path.trim().eq_ignore_ascii_case(f)),
        empty_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    #[test]
    fn test_compound_by_key() {
        assert_eq!(classify("address").compound, Some(CompoundCategory::Address));
        assert_eq!(classify("pickupAddress").compound, Some(CompoundCategory::Address));
        assert_eq!(classify("address.postcode").compound, None);
        assert_eq!(classify("emailAddress").compound, None);
        assert_eq!(classify("homeAddress").compound, Some(CompoundCategory::Address));
        assert_eq!(classify("vehicle").compound, Some(CompoundCategory::Vehicle));
        assert_eq!(classify("vehicle.registration").compound, None);
        assert_eq!(classify("parents").compound, Some(CompoundCategory::Parents));
        assert_eq!(
            classify("parents.0.relationship").compound,
            Some(CompoundCategory::Relationship)
        );
        assert_eq!(
            classify("temporaryDriver").compound,
            Some(CompoundCategory::TemporaryDriver)
        );
        assert_eq!(classify("driverPrice").compound, Some(CompoundCategory::Price));
    }

    #[test]
    fn test_templated_item_keyed_by_collection() {
        let item = format!("trainings.{ID}");
        assert_eq!(classify(&item).compound, Some(CompoundCategory::Training));
        assert_eq!(classify("trainings.new").compound, Some(CompoundCategory::Training));
        let sub = format!("trainings.{ID}.completionDate");
        assert_eq!(classify(&sub).compound, None);
        assert!(classify(&sub).is_temporal);
    }

    #[test]
    fn test_container_categories_match_whole_path() {
        assert_eq!(
            classify("operatingHours.monday").compound,
            Some(CompoundCategory::OperatingHours)
        );
    }

    #[test]
    fn test_reference_detection() {
        assert!(classify("permanentDriver").is_reference);
        assert!(classify("vendor").is_reference);
        assert!(classify("pa").is_reference);
        assert!(classify("assignedPa").is_reference);
        assert!(!classify("parents").is_reference);
        assert!(!classify("vehicle.capacity").is_reference);
        assert!(!classify("passengers").is_reference);
    }

    #[test]
    fn test_flags() {
        assert!(classify("isActive").is_active_flag);
        assert!(classify("status").is_status);
        assert!(classify("dbsExpiry").is_temporal);
        assert!(classify("uploadedAt").is_temporal);
        assert!(classify("temporaryDriver").is_temporary);
        assert!(classify("trainings.fileUpload").is_bookkeeping);
        assert!(!classify("trainings.fileName").is_bookkeeping);
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(classify("email").empty_message, "No email address");
        assert_eq!(classify("contactEmail").empty_message, "No email address");
        assert_eq!(classify("address.postcode").empty_message, "No postcode");
        assert_eq!(classify("favouriteColour").empty_message, DEFAULT_EMPTY_MESSAGE);
    }

    #[test]
    fn test_structural_route_records() {
        assert_eq!(classify("Stop Added").structural, Some(StructuralCategory::Stop));
        assert!(classify("Stop Added").is_stop_membership);
        assert_eq!(classify("Stop Added").compound, Some(CompoundCategory::Stop));
        assert!(classify("Stop Sequence Updated").is_stop_sequence);
        assert_ne!(
            classify("Stop Sequence Updated").compound,
            Some(CompoundCategory::Stop)
        );
        assert_eq!(
            classify("Day-wise Student Added").structural,
            Some(StructuralCategory::DayWiseStudent)
        );
        assert_eq!(
            classify("specialService").structural,
            Some(StructuralCategory::SpecialService)
        );
        assert_eq!(classify("email").structural, None);
    }
}
