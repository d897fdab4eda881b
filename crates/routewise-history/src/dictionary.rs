//! # Field Dictionary — Path → Display Label
//!
//! Each entity type sees the common dictionary extended (and where keys
//! collide, overridden) by its own entries. Lookup never fails: a path with
//! no entry is humanized segment by segment.
//!
//! ## Templated collections
//!
//! Some collections are keyed by an embedded identifier rather than a fixed
//! sub-field, e.g. `trainings.65a1…f6.completionDate`. For those the
//! identifier segment is stripped and the remaining sub-field is looked up
//! instead. `<collection>.new` is the sentinel for "an item was added".

use std::collections::HashMap;

use routewise_core::{is_embedded_identifier, EntityType};

use crate::text::humanize_path;

/// A collection whose items are addressed by an embedded identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplatedCollection {
    /// Root path segment, e.g. `trainings`.
    pub root: &'static str,
    /// Dictionary key for a single item, e.g. `training`.
    pub item_key: &'static str,
    /// Display name of a single item, e.g. `Training`.
    pub item_label: &'static str,
}

/// Collections addressed as `<root>.<id>[.<subfield>]`.
pub const TEMPLATED_COLLECTIONS: &[TemplatedCollection] = &[
    TemplatedCollection {
        root: "trainings",
        item_key: "training",
        item_label: "Training",
    },
    TemplatedCollection {
        root: "documents",
        item_key: "document",
        item_label: "Document",
    },
];

/// Segment that marks an item added to a templated collection.
pub const NEW_ITEM_SEGMENT: &str = "new";

/// The templated collection `path` belongs to, if any.
pub fn templated_collection(path: &str) -> Option<&'static TemplatedCollection> {
    let root = path.split('.').next()?;
    TEMPLATED_COLLECTIONS.iter().find(|c| c.root == root)
}

/// Whether `path` is `<collection>.new`.
pub fn is_new_item_path(path: &str) -> bool {
    let mut segments = path.split('.');
    let root_matches = segments
        .next()
        .is_some_and(|root| TEMPLATED_COLLECTIONS.iter().any(|c| c.root == root));
    root_matches && segments.next() == Some(NEW_ITEM_SEGMENT) && segments.next().is_none()
}

/// Whether `path` is exactly `<collection>.<id>`, i.e. addresses a whole item.
pub fn is_item_path(path: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    segments.len() == 2 && templated_collection(path).is_some() && is_embedded_identifier(segments[1])
}

const COMMON: &[(&str, &str)] = &[
    ("name", "Name"),
    ("firstName", "First Name"),
    ("lastName", "Last Name"),
    ("email", "Email Address"),
    ("phone", "Phone Number"),
    ("mobile", "Mobile Number"),
    ("dateOfBirth", "Date of Birth"),
    ("gender", "Gender"),
    ("address", "Address"),
    ("address.street", "Street"),
    ("address.city", "City"),
    ("address.county", "County"),
    ("address.postcode", "Postcode"),
    ("isActive", "Status"),
    ("status", "Status"),
    ("notes", "Notes"),
    ("documents", "Documents"),
    ("document", "Document"),
    ("emergencyContact", "Emergency Contact"),
    ("createdAt", "Created"),
    ("updatedAt", "Last Updated"),
    ("issueDate", "Issue Date"),
    ("expiryDate", "Expiry Date"),
    ("description", "Description"),
];

const DRIVER: &[(&str, &str)] = &[
    ("licenceNumber", "Licence Number"),
    ("licenceExpiry", "Licence Expiry"),
    ("dbsNumber", "DBS Number"),
    ("dbsExpiry", "DBS Expiry"),
    ("badgeNumber", "Badge Number"),
    ("vehicle", "Vehicle"),
    ("vehicle.registration", "Vehicle Registration"),
    ("vehicle.make", "Vehicle Make"),
    ("vehicle.model", "Vehicle Model"),
    ("vehicle.capacity", "Vehicle Capacity"),
    ("vendor", "Vendor"),
    ("trainings", "Trainings"),
    ("training", "Training"),
    ("completionDate", "Completion Date"),
    ("certificateNumber", "Certificate Number"),
    ("isActive", "Driver Status"),
];

const SCHOOL: &[(&str, &str)] = &[
    ("name", "School Name"),
    ("contactName", "Contact Name"),
    ("contactEmail", "Contact Email"),
    ("contactPhone", "Contact Phone"),
    ("operatingHours", "Operating Hours"),
    ("holidays", "School Holidays"),
    ("schoolHolidays", "School Holidays"),
    ("localAuthority", "Local Authority"),
];

const PERSONAL_ASSISTANT: &[(&str, &str)] = &[
    ("dbsNumber", "DBS Number"),
    ("dbsExpiry", "DBS Expiry"),
    ("vendor", "Vendor"),
    ("trainings", "Trainings"),
    ("training", "Training"),
    ("completionDate", "Completion Date"),
    ("certificateNumber", "Certificate Number"),
    ("isActive", "PA Status"),
];

const STUDENT: &[(&str, &str)] = &[
    ("parents", "Parents"),
    ("school", "School"),
    ("yearGroup", "Year Group"),
    ("specialCareNeeds", "Special Care Needs"),
    ("pickupAddress", "Pickup Address"),
    ("dropoffAddress", "Drop-off Address"),
    ("isActive", "Student Status"),
];

const ROUTE: &[(&str, &str)] = &[
    ("name", "Route Name"),
    ("routeNumber", "Route Number"),
    ("permanentDriver", "Permanent Driver"),
    ("driverPrice", "Driver Price"),
    ("pa", "Passenger Assistant"),
    ("paPrice", "PA Price"),
    ("temporaryDriver", "Temporary Driver"),
    ("vehicleType", "Vehicle Type"),
    ("school", "School"),
    ("stops", "Stops"),
    ("specialService", "Special Service"),
    ("isActive", "Route Status"),
    // Membership sentinels keep their hyphen.
    ("Day-wise Student Added", "Day-wise Student Added"),
    ("Day-wise Student Removed", "Day-wise Student Removed"),
    ("Day-wise Student Updated", "Day-wise Student Updated"),
];

fn entity_entries(entity: EntityType) -> &'static [(&'static str, &'static str)] {
    match entity {
        EntityType::Driver => DRIVER,
        EntityType::School => SCHOOL,
        EntityType::PersonalAssistant => PERSONAL_ASSISTANT,
        EntityType::Student => STUDENT,
        EntityType::Route => ROUTE,
    }
}

/// Label table for one entity type.
#[derive(Debug, Clone)]
pub struct FieldDictionary {
    entity: EntityType,
    labels: HashMap<&'static str, &'static str>,
}

impl FieldDictionary {
    /// Common entries overlaid with the entity-specific ones.
    pub fn for_entity(entity: EntityType) -> Self {
        let labels = COMMON
            .iter()
            .chain(entity_entries(entity))
            .copied()
            .collect();
        Self { entity, labels }
    }

    /// Entity type this dictionary serves.
    pub fn entity(&self) -> EntityType {
        self.entity
    }

    /// Exact dictionary entry, without any fallback.
    pub fn get(&self, path: &str) -> Option<&'static str> {
        self.labels.get(path).copied()
    }

    /// Display label for `path`. Always returns something readable.
    pub fn label_for(&self, path: &str) -> String {
        if let Some(label) = self.get(path) {
            return label.to_string();
        }

        if let Some(collection) = templated_collection(path) {
            if is_new_item_path(path) {
                return format!("New {} Added", collection.item_label);
            }
            let segments: Vec<&str> = path.split('.').collect();
            if segments.len() >= 2 && is_embedded_identifier(segments[1]) {
                let rest = segments[2..].join(".");
                if rest.is_empty() {
                    return self
                        .get(collection.item_key)
                        .unwrap_or(collection.item_label)
                        .to_string();
                }
                return self
                    .get(&rest)
                    .map(str::to_string)
                    .unwrap_or_else(|| humanize_path(&rest));
            }
        }

        // Array indices and ids inside ordinary paths carry no meaning for
        // the label: `parents.0.email` reads as `parents.email`.
        let stripped: Vec<&str> = path
            .split('.')
            .filter(|seg| !is_embedded_identifier(seg))
            .collect();
        if !stripped.is_empty() && stripped.len() < path.split('.').count() {
            let stripped = stripped.join(".");
            return self
                .get(&stripped)
                .map(str::to_string)
                .unwrap_or_else(|| humanize_path(&stripped));
        }

        humanize_path(path)
    }
}

/// One-shot lookup for callers that do not keep a dictionary around.
pub fn label_for(entity: EntityType, path: &str) -> String {
    FieldDictionary::for_entity(entity).label_for(path)
}
