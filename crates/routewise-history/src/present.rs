//! # History Presenter — Ordering and Entry Assembly
//!
//! Turns filtered [`HistoryItem`]s into display-ready [`PresentationEntry`]
//! values: a label, optional before/after texts, the edit time and an
//! [`EntryKind`] that tells the display layer which template to use.
//!
//! Ordering is newest-first for every entity type except routes, whose
//! items keep the order the correlator produced so that grouped records
//! stay together. Items without a parseable time sort as oldest; the sort is
//! stable, so ties keep their input order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use routewise_core::{ChangeRecord, ChangeValue, EditTime, EntityType};

use crate::category::{classify, CompoundCategory, StructuralCategory};
use crate::context::HistoryContext;
use crate::correlate::{CombinedChangeRecord, CombinedKind, HistoryItem};
use crate::dictionary::{is_item_path, is_new_item_path, templated_collection, FieldDictionary};
use crate::format::ValueFormatter;
use crate::resolver::ReferenceResolver;
use crate::text::format_date;

// ─── Entry model ─────────────────────────────────────────────────────

/// Wording for stop and day-wise student membership edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    /// Something joined the route.
    Added,
    /// Something left the route.
    Removed,
    /// Something changed position or details.
    Moved,
}

impl MembershipChange {
    /// Lower-case verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Moved => "moved",
        }
    }
}

/// Which rendering template an entry uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Plain before/after.
    Plain,
    /// Assignment and price shown together.
    Assignment(CombinedKind),
    /// Temporary driver composite.
    TemporaryDriver,
    /// Special service before/after.
    SpecialService,
    /// Special service removed; only the old value is shown.
    SpecialServiceRemoved,
    /// Stop or day-wise student membership.
    Membership(MembershipChange),
    /// New item in a templated collection; only the new value is shown.
    NewItemAdded,
    /// Whole item removed from a templated collection.
    ItemRemoved,
}

/// One line of the rendered history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationEntry {
    /// Raw field path the entry was built from.
    pub field: String,
    /// Display label.
    pub label: String,
    /// Text before the edit, if the template shows one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Text after the edit, if the template shows one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// When the edit happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<EditTime>,
    /// Absolute date text, in the configured format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Rendering template.
    pub kind: EntryKind,
}

impl PresentationEntry {
    /// Human relative time ("5 minutes ago") against a caller-supplied
    /// `now`. Edits a week old or more show the absolute date; unparseable
    /// times show their raw text; entries with no time return `None`.
    pub fn relative_to(&self, now: DateTime<Utc>) -> Option<String> {
        let edit = self.updated_at.as_ref()?;
        let Some(at) = edit.timestamp() else {
            return Some(edit.raw());
        };
        let elapsed = now.signed_duration_since(*at.as_datetime());
        let text = if elapsed.num_minutes() < 1 {
            "just now".to_string()
        } else if elapsed.num_hours() < 1 {
            plural(elapsed.num_minutes(), "minute")
        } else if elapsed.num_days() < 1 {
            plural(elapsed.num_hours(), "hour")
        } else if elapsed.num_days() < 7 {
            plural(elapsed.num_days(), "day")
        } else {
            return self.date.clone().or_else(|| Some(at.to_rfc3339()));
        };
        Some(text)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

// ─── Presenter ───────────────────────────────────────────────────────

/// Builds entries for one entity type.
#[derive(Debug, Clone)]
pub struct HistoryPresenter<'a> {
    entity: EntityType,
    dictionary: FieldDictionary,
    formatter: ValueFormatter<'a>,
}

impl<'a> HistoryPresenter<'a> {
    /// Presenter for `entity` over `ctx`.
    pub fn new(entity: EntityType, ctx: HistoryContext<'a>) -> Self {
        Self {
            entity,
            dictionary: FieldDictionary::for_entity(entity),
            formatter: ValueFormatter::new(entity, ctx),
        }
    }

    fn date_text(&self, at: Option<&EditTime>) -> Option<String> {
        let at = at?.timestamp()?;
        Some(format_date(at.as_datetime(), &self.formatter.context().config.date_format))
    }

    fn entry(
        &self,
        field: &str,
        label: String,
        (before, after): (Option<String>, Option<String>),
        updated_at: Option<&EditTime>,
        kind: EntryKind,
    ) -> PresentationEntry {
        PresentationEntry {
            field: field.to_string(),
            label,
            before,
            after,
            date: self.date_text(updated_at),
            updated_at: updated_at.cloned(),
            kind,
        }
    }

    fn assignment_entry(&self, c: &CombinedChangeRecord) -> PresentationEntry {
        let f = &self.formatter;
        let price_field = c.secondary_field.as_str();
        let side = |who: &ChangeValue, price: &ChangeValue| {
            format!("{} - {}", f.format_assignee(who), f.format_price(price, price_field))
        };
        self.entry(
            c.primary_field.as_str(),
            format!("Changed {}", self.dictionary.label_for(c.primary_field.as_str())),
            (
                Some(side(&c.primary_before, &c.secondary_before)),
                Some(side(&c.primary_after, &c.secondary_after)),
            ),
            c.updated_at.as_ref(),
            EntryKind::Assignment(c.kind),
        )
    }

    /// Text for a day-wise student value, naming the student when the record
    /// carries one alongside the days.
    fn day_wise_text(&self, r: &ChangeRecord, value: &ChangeValue) -> String {
        let days = self.formatter.format(value, r.field.as_str());
        match r.extra("student").filter(|s| s.is_present()) {
            Some(student) => {
                let name = ReferenceResolver::from_context(&self.formatter.context()).resolve(student);
                if value.is_empty() {
                    name
                } else {
                    format!("{name} ({days})")
                }
            }
            None => days,
        }
    }

    fn single_entry(&self, r: &ChangeRecord) -> PresentationEntry {
        let field = r.field.as_str();
        let profile = classify(field);
        let label = self.dictionary.label_for(field);
        let at = r.effective_time();
        let fmt = |v: &ChangeValue| self.formatter.format(v, field);

        if is_new_item_path(field) {
            return self.entry(field, label, (None, Some(fmt(&r.new_value))), at, EntryKind::NewItemAdded);
        }
        if is_item_path(field) && r.new_value.is_empty() {
            let label = templated_collection(field)
                .map(|c| format!("{} Removed", c.item_label))
                .unwrap_or(label);
            return self.entry(field, label, (Some(fmt(&r.old_value)), None), at, EntryKind::ItemRemoved);
        }

        match profile.structural {
            Some(StructuralCategory::SpecialService) => {
                if r.new_value.is_empty() && r.old_value.is_present() {
                    let label = if label.ends_with("Removed") {
                        label
                    } else {
                        format!("{label} Removed")
                    };
                    self.entry(field, label, (Some(fmt(&r.old_value)), None), at, EntryKind::SpecialServiceRemoved)
                } else {
                    let texts = (Some(fmt(&r.old_value)), Some(fmt(&r.new_value)));
                    self.entry(field, label, texts, at, EntryKind::SpecialService)
                }
            }
            Some(category @ (StructuralCategory::Stop | StructuralCategory::DayWiseStudent)) => {
                let change = membership_change(field, &r.old_value, &r.new_value);
                let text = |v: &ChangeValue| match category {
                    StructuralCategory::DayWiseStudent => self.day_wise_text(r, v),
                    _ => fmt(v),
                };
                let texts = match change {
                    MembershipChange::Added => (None, Some(text(&r.new_value))),
                    MembershipChange::Removed => (Some(text(&r.old_value)), None),
                    MembershipChange::Moved => (Some(text(&r.old_value)), Some(text(&r.new_value))),
                };
                self.entry(field, label, texts, at, EntryKind::Membership(change))
            }
            _ if profile.compound == Some(CompoundCategory::TemporaryDriver) => {
                let texts = (Some(fmt(&r.old_value)), Some(fmt(&r.new_value)));
                self.entry(field, label, texts, at, EntryKind::TemporaryDriver)
            }
            _ => {
                let texts = (Some(fmt(&r.old_value)), Some(fmt(&r.new_value)));
                self.entry(field, label, texts, at, EntryKind::Plain)
            }
        }
    }

    /// Entry for one item.
    pub fn entry_for(&self, item: &HistoryItem) -> PresentationEntry {
        match item {
            HistoryItem::Single(r) => self.single_entry(r),
            HistoryItem::Combined(c) => self.assignment_entry(c),
        }
    }

    /// Order `items` and build their entries.
    pub fn present(&self, items: &[HistoryItem]) -> Vec<PresentationEntry> {
        let mut ordered: Vec<&HistoryItem> = items.iter().collect();
        if !self.entity.preserves_grouping() {
            ordered.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        }
        ordered.into_iter().map(|item| self.entry_for(item)).collect()
    }
}

/// Added/removed/moved, from the field name when it says so, otherwise from
/// which side holds a value.
fn membership_change(field: &str, old: &ChangeValue, new: &ChangeValue) -> MembershipChange {
    let lower = field.to_lowercase();
    if lower.contains("added") {
        MembershipChange::Added
    } else if lower.contains("removed") {
        MembershipChange::Removed
    } else if old.is_empty() && new.is_present() && !new.is_empty() {
        MembershipChange::Added
    } else if new.is_empty() && !old.is_empty() {
        MembershipChange::Removed
    } else {
        MembershipChange::Moved
    }
}

/// One-shot presentation.
pub fn present(items: &[HistoryItem], entity: EntityType, ctx: HistoryContext<'_>) -> Vec<PresentationEntry> {
    HistoryPresenter::new(entity, ctx).present(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::context::LookupMaps;
    use routewise_core::FieldPath;
    use serde_json::json;

    const ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    fn record(field: &str, old: serde_json::Value, new: serde_json::Value, at: Option<&str>) -> ChangeRecord {
        ChangeRecord::new(
            FieldPath::new(field).unwrap(),
            ChangeValue::from_json(&old),
            ChangeValue::from_json(&new),
            at.map(EditTime::from_text),
        )
    }

    fn present_with(entity: EntityType, maps: &LookupMaps, items: Vec<HistoryItem>) -> Vec<PresentationEntry> {
        let config = HistoryConfig::default();
        present(&items, entity, maps.context(&config))
    }

    fn single(entity: EntityType, r: ChangeRecord) -> PresentationEntry {
        let maps = LookupMaps::new()
            .with_name("D1", "John Smith")
            .with_name("S1", "Amy Pond")
            .with_training("T1", "First Aid");
        present_with(entity, &maps, vec![r.into()]).remove(0)
    }

    #[test]
    fn test_newest_first_with_missing_last() {
        let items = vec![
            record("email", json!("a"), json!("b"), Some("2024-01-01T10:00:00Z")).into(),
            record("phone", json!("1"), json!("2"), None).into(),
            record("name", json!("x"), json!("y"), Some("2024-03-01T10:00:00Z")).into(),
            record("notes", json!("x"), json!("y"), Some("garbage")).into(),
        ];
        let fields: Vec<String> = present_with(EntityType::School, &LookupMaps::new(), items)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["name", "email", "phone", "notes"]);
    }

    #[test]
    fn test_route_keeps_input_order() {
        let items = vec![
            record("name", json!("x"), json!("y"), Some("2024-01-01T10:00:00Z")).into(),
            record("vehicleType", json!("x"), json!("y"), Some("2024-03-01T10:00:00Z")).into(),
        ];
        let fields: Vec<String> = present_with(EntityType::Route, &LookupMaps::new(), items)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["name", "vehicleType"]);
    }

    #[test]
    fn test_plain_entry() {
        let e = single(EntityType::Student, record("isActive", json!(true), json!(false), Some("2024-01-05T09:00:00Z")));
        assert_eq!(e.kind, EntryKind::Plain);
        assert_eq!(e.before.as_deref(), Some("Active"));
        assert_eq!(e.after.as_deref(), Some("Inactive"));
        assert_eq!(e.date.as_deref(), Some("05 Jan 2024"));
    }

    #[test]
    fn test_new_training_added() {
        let e = single(
            EntityType::PersonalAssistant,
            record("trainings.new", json!(null), json!({"training": "T1"}), None),
        );
        assert_eq!(e.kind, EntryKind::NewItemAdded);
        assert_eq!(e.label, "New Training Added");
        assert_eq!(e.before, None);
        assert!(e.after.unwrap_or_default().contains("First Aid"));
    }

    #[test]
    fn test_training_removed() {
        let e = single(
            EntityType::Driver,
            record(&format!("trainings.{ID}"), json!({"training": "T1"}), json!(null), None),
        );
        assert_eq!(e.kind, EntryKind::ItemRemoved);
        assert_eq!(e.label, "Training Removed");
        assert_eq!(e.after, None);
    }

    #[test]
    fn test_special_service_removed() {
        let e = single(EntityType::Route, record("specialService", json!({"name": "Gala"}), json!(null), None));
        assert_eq!(e.kind, EntryKind::SpecialServiceRemoved);
        assert_eq!(e.label, "Special Service Removed");
        assert!(e.before.unwrap_or_default().contains("Gala"));
        assert_eq!(e.after, None);

        let e = single(EntityType::Route, record("specialService", json!(null), json!({"name": "Gala"}), None));
        assert_eq!(e.kind, EntryKind::SpecialService);
    }

    #[test]
    fn test_membership_wording() {
        let e = single(EntityType::Route, record("Stop Added", json!(null), json!({"name": "Market Square"}), None));
        assert_eq!(e.kind, EntryKind::Membership(MembershipChange::Added));
        assert_eq!(e.before, None);
        assert!(e.after.unwrap_or_default().contains("Market Square"));

        let e = single(EntityType::Route, record("Stop Removed", json!({"name": "Depot"}), json!(null), None));
        assert_eq!(e.kind, EntryKind::Membership(MembershipChange::Removed));

        let e = single(EntityType::Route, record("Stop Sequence Updated", json!(["a"]), json!(["b"]), None));
        assert_eq!(e.kind, EntryKind::Membership(MembershipChange::Moved));
    }

    #[test]
    fn test_day_wise_student_names_student() {
        let mut r = record("Day-wise Student Added", json!(null), json!(["monday", "friday"]), None);
        r.extras.insert("student".into(), ChangeValue::Text("S1".into()));
        let e = single(EntityType::Route, r);
        assert_eq!(e.kind, EntryKind::Membership(MembershipChange::Added));
        assert_eq!(e.after.as_deref(), Some("Amy Pond (Monday, Friday)"));
    }

    #[test]
    fn test_temporary_driver_kind() {
        let e = single(
            EntityType::Route,
            record("temporaryDriver", json!(null), json!({"driver": "D1"}), None),
        );
        assert_eq!(e.kind, EntryKind::TemporaryDriver);
        assert!(e.after.unwrap_or_default().contains("John Smith"));
    }

    #[test]
    fn test_relative_time() {
        let e = single(EntityType::School, record("name", json!("a"), json!("b"), Some("2024-01-05T09:00:00Z")));
        let at = |s: &str| s.parse::<DateTime<Utc>>().unwrap();
        assert_eq!(e.relative_to(at("2024-01-05T09:00:30Z")).as_deref(), Some("just now"));
        assert_eq!(e.relative_to(at("2024-01-05T09:01:00Z")).as_deref(), Some("1 minute ago"));
        assert_eq!(e.relative_to(at("2024-01-05T09:45:00Z")).as_deref(), Some("45 minutes ago"));
        assert_eq!(e.relative_to(at("2024-01-05T12:00:00Z")).as_deref(), Some("3 hours ago"));
        assert_eq!(e.relative_to(at("2024-01-07T09:00:00Z")).as_deref(), Some("2 days ago"));
        assert_eq!(e.relative_to(at("2024-02-05T09:00:00Z")).as_deref(), Some("05 Jan 2024"));

        let raw = single(EntityType::School, record("name", json!("a"), json!("b"), Some("last tuesday")));
        assert_eq!(raw.relative_to(at("2024-02-05T09:00:00Z")).as_deref(), Some("last tuesday"));
        let none = single(EntityType::School, record("name", json!("a"), json!("b"), None));
        assert_eq!(none.relative_to(at("2024-02-05T09:00:00Z")), None);
    }

    #[test]
    fn test_entry_serializes_for_display_layer() {
        let e = single(EntityType::Student, record("isActive", json!(true), json!(false), None));
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["label"], "Student Status");
        assert_eq!(v["kind"], "plain");
        assert!(v.get("updatedAt").is_none());
    }
}
