//! # Value Formatter — Priority-Ordered Rule Chain
//!
//! Formats one change payload for display. Formatting is an explicit,
//! ordered list of `(predicate, renderer)` pairs in [`RULES`]; the first
//! rule whose predicate holds renders the value. Several predicates
//! overlap, so the order *is* the contract:
//!
//! | # | Rules                         | Why it sits here                      |
//! |---|-------------------------------|---------------------------------------|
//! | 1 | domain literal formatters     | compound objects must not reach the   |
//! |   |                               | empty/date/stringify rules            |
//! | 2 | reference                     | ids must resolve before stringifying  |
//! | 3 | boolean                       |                                       |
//! | 4 | empty                         | category-keyed empty messages         |
//! | 5 | status enum                   |                                       |
//! | 6 | date/time                     | name heuristic + parseable value      |
//! | 7 | generic array                 |                                       |
//! | 8 | fallback                      | always matches                        |

mod domain;
pub mod labels;

use routewise_core::{ChangeValue, EntityType};

use crate::category::{classify, CompoundCategory, FieldProfile};
use crate::context::HistoryContext;
use crate::resolver::ReferenceResolver;
use crate::text::{format_currency, format_date};

/// What a rule sees.
#[derive(Debug, Clone, Copy)]
pub struct FormatInput<'a> {
    /// The payload being formatted.
    pub value: &'a ChangeValue,
    /// Field path of the record.
    pub field: &'a str,
    /// Classification of `field`.
    pub profile: FieldProfile,
    /// Owning entity type.
    pub entity: EntityType,
    /// Lookup maps and configuration.
    pub ctx: HistoryContext<'a>,
}

impl<'a> FormatInput<'a> {
    /// The same input pointed at a nested value.
    pub fn with_value(&self, value: &'a ChangeValue) -> Self {
        Self { value, ..*self }
    }

    fn is_compound(&self, category: CompoundCategory) -> bool {
        self.profile.compound == Some(category)
    }

    pub(crate) fn resolver(&self) -> ReferenceResolver<'a> {
        ReferenceResolver::from_context(&self.ctx)
    }

    /// Date text of a nested value: formatted when parseable, raw otherwise.
    pub(crate) fn date_text(&self, value: Option<&ChangeValue>) -> Option<String> {
        let value = value?;
        match value.as_datetime() {
            Some(at) => Some(format_date(&at, &self.ctx.config.date_format)),
            None => value.as_text(),
        }
    }

    /// Currency text of a nested value.
    pub(crate) fn currency_text(&self, value: Option<&ChangeValue>) -> Option<String> {
        value?
            .as_f64()
            .map(|amount| format_currency(amount, &self.ctx.config.currency_symbol))
    }
}

/// One link of the chain.
#[derive(Clone, Copy)]
pub struct FormatRule {
    /// Stable rule name, used in logs and tests.
    pub name: &'static str,
    /// Whether the rule handles this input.
    pub applies: fn(&FormatInput<'_>) -> bool,
    /// Render the value.
    pub render: fn(&FormatInput<'_>) -> String,
}

impl std::fmt::Debug for FormatRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRule").field("name", &self.name).finish()
    }
}

/// The rule chain, in priority order.
pub const RULES: &[FormatRule] = &[
    // ── 1. domain literal formatters ──
    FormatRule {
        name: "document",
        applies: |i| i.is_compound(CompoundCategory::Document) && is_object_or_list(i.value),
        render: domain::document,
    },
    FormatRule {
        name: "vehicle",
        applies: |i| i.is_compound(CompoundCategory::Vehicle) && i.value.is_composite(),
        render: domain::vehicle,
    },
    FormatRule {
        name: "address",
        applies: |i| {
            i.is_compound(CompoundCategory::Address)
                && (i.value.is_composite() || i.value.is_empty())
        },
        render: domain::address,
    },
    FormatRule {
        name: "emergency_contact",
        applies: |i| i.is_compound(CompoundCategory::EmergencyContact) && i.value.is_composite(),
        render: domain::emergency_contact,
    },
    FormatRule {
        name: "training",
        applies: |i| i.is_compound(CompoundCategory::Training) && is_object_or_list(i.value),
        render: domain::training,
    },
    FormatRule {
        name: "special_care_needs",
        applies: |i| {
            i.is_compound(CompoundCategory::SpecialCareNeeds) && is_object_or_list(i.value)
        },
        render: domain::special_care_needs,
    },
    FormatRule {
        name: "parents",
        applies: |i| i.is_compound(CompoundCategory::Parents) && is_object_or_list(i.value),
        render: domain::parents,
    },
    FormatRule {
        name: "relationship",
        applies: |i| {
            i.is_compound(CompoundCategory::Relationship)
                && matches!(i.value, ChangeValue::Text(s) if !s.trim().is_empty())
        },
        render: domain::relationship,
    },
    FormatRule {
        name: "temporary_driver",
        applies: |i| i.is_compound(CompoundCategory::TemporaryDriver) && i.value.is_composite(),
        render: domain::temporary_driver,
    },
    FormatRule {
        name: "school_holidays",
        applies: |i| i.is_compound(CompoundCategory::SchoolHolidays) && is_object_or_list(i.value),
        render: domain::school_holidays,
    },
    FormatRule {
        name: "operating_hours",
        applies: |i| i.is_compound(CompoundCategory::OperatingHours) && i.value.is_composite(),
        render: domain::operating_hours,
    },
    FormatRule {
        name: "special_service",
        applies: |i| i.is_compound(CompoundCategory::SpecialService) && i.value.is_composite(),
        render: domain::special_service,
    },
    FormatRule {
        name: "stop",
        applies: |i| i.is_compound(CompoundCategory::Stop) && i.value.is_composite(),
        render: domain::stop,
    },
    FormatRule {
        name: "day_wise_student",
        applies: |i| i.is_compound(CompoundCategory::DayWiseStudent) && !i.value.is_empty(),
        render: domain::day_wise_student,
    },
    FormatRule {
        name: "price",
        applies: |i| i.is_compound(CompoundCategory::Price) && i.value.as_f64().is_some(),
        render: |i| i.currency_text(Some(i.value)).unwrap_or_default(),
    },
    // ── 2. references ──
    FormatRule {
        name: "reference",
        applies: |i| {
            i.profile.is_reference
                && match i.value {
                    ChangeValue::Reference(_) | ChangeValue::Composite(_) => true,
                    ChangeValue::Text(s) => !s.trim().is_empty(),
                    ChangeValue::Collection(items) => !items.is_empty(),
                    _ => false,
                }
        },
        render: |i| i.resolver().resolve(i.value),
    },
    // ── 3. booleans ──
    FormatRule {
        name: "boolean",
        applies: |i| i.value.as_bool().is_some(),
        render: |i| match (i.profile.is_active_flag, i.value.as_bool().unwrap_or_default()) {
            (true, true) => "Active".to_string(),
            (true, false) => "Inactive".to_string(),
            (false, true) => "Yes".to_string(),
            (false, false) => "No".to_string(),
        },
    },
    // ── 4. empty ──
    FormatRule {
        name: "empty",
        applies: |i| i.value.is_empty(),
        render: |i| i.profile.empty_message.to_string(),
    },
    // ── 5. status enums ──
    FormatRule {
        name: "status",
        applies: |i| i.profile.is_status && matches!(i.value, ChangeValue::Text(_)),
        render: |i| labels::status_label(&i.value.as_text().unwrap_or_default()),
    },
    // ── 6. dates ──
    FormatRule {
        name: "date",
        applies: |i| i.profile.is_temporal && i.value.as_datetime().is_some(),
        render: |i| i.date_text(Some(i.value)).unwrap_or_default(),
    },
    // ── 7. generic arrays ──
    FormatRule {
        name: "collection",
        applies: |i| i.value.is_collection(),
        render: domain::generic_collection,
    },
    // ── 8. fallback ──
    FormatRule {
        name: "fallback",
        applies: |_| true,
        render: |i| stringify(i.value),
    },
];

fn is_object_or_list(value: &ChangeValue) -> bool {
    value.is_composite() || value.is_collection()
}

/// Raw stringification of any value.
pub fn stringify(value: &ChangeValue) -> String {
    match value {
        ChangeValue::Absent => String::new(),
        ChangeValue::Text(s) => s.clone(),
        ChangeValue::Composite(_) | ChangeValue::Collection(_) => value.to_json().to_string(),
        other => other.as_text().unwrap_or_default(),
    }
}

/// Formats values for one entity type against one context.
#[derive(Debug, Clone, Copy)]
pub struct ValueFormatter<'a> {
    entity: EntityType,
    ctx: HistoryContext<'a>,
}

impl<'a> ValueFormatter<'a> {
    /// Formatter for `entity`.
    pub fn new(entity: EntityType, ctx: HistoryContext<'a>) -> Self {
        Self { entity, ctx }
    }

    /// Context this formatter reads from.
    pub fn context(&self) -> HistoryContext<'a> {
        self.ctx
    }

    /// Entity type this formatter serves.
    pub fn entity(&self) -> EntityType {
        self.entity
    }

    fn input<'v>(&self, value: &'v ChangeValue, field: &'v str) -> FormatInput<'v>
    where
        'a: 'v,
    {
        FormatInput {
            value,
            field,
            profile: classify(field),
            entity: self.entity,
            ctx: self.ctx,
        }
    }

    /// The first rule that handles `value` under `field`.
    pub fn matching_rule(&self, value: &ChangeValue, field: &str) -> &'static FormatRule {
        let input = self.input(value, field);
        RULES
            .iter()
            .find(|rule| (rule.applies)(&input))
            .unwrap_or(&RULES[RULES.len() - 1])
    }

    /// Format `value` as it appeared under `field`.
    pub fn format(&self, value: &ChangeValue, field: &str) -> String {
        let input = self.input(value, field);
        let rule = RULES
            .iter()
            .find(|rule| (rule.applies)(&input))
            .unwrap_or(&RULES[RULES.len() - 1]);
        (rule.render)(&input)
    }

    /// The reference side of an assignment: always resolved as a name,
    /// "Not provided" when absent.
    pub fn format_assignee(&self, value: &ChangeValue) -> String {
        ReferenceResolver::from_context(&self.ctx).resolve(value)
    }

    /// The price side of an assignment: currency when numeric, "Not
    /// provided" when absent, otherwise the text the chain renders under
    /// `field` ("TBC" stays "TBC").
    pub fn format_price(&self, value: &ChangeValue, field: &str) -> String {
        if value.is_empty() {
            return crate::resolver::NOT_PROVIDED.to_string();
        }
        match value.as_f64() {
            Some(amount) => format_currency(amount, &self.ctx.config.currency_symbol),
            None => self.format(value, field),
        }
    }
}

/// One-shot formatting.
pub fn format(
    value: &ChangeValue,
    field: &str,
    entity: EntityType,
    ctx: HistoryContext<'_>,
) -> String {
    ValueFormatter::new(entity, ctx).format(value, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HistoryConfig, UnresolvedReference};
    use crate::context::LookupMaps;
    use serde_json::json;

    const ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    fn fmt_with(maps: &LookupMaps, config: &HistoryConfig, v: serde_json::Value, field: &str) -> String {
        ValueFormatter::new(EntityType::Driver, maps.context(config))
            .format(&ChangeValue::from_json(&v), field)
    }

    fn fmt(v: serde_json::Value, field: &str) -> String {
        let maps = LookupMaps::new().with_name("D1", "John Smith");
        fmt_with(&maps, &HistoryConfig::default(), v, field)
    }

    fn rule(v: serde_json::Value, field: &str) -> &'static str {
        let maps = LookupMaps::new();
        let config = HistoryConfig::default();
        ValueFormatter::new(EntityType::Driver, maps.context(&config))
            .matching_rule(&ChangeValue::from_json(&v), field)
            .name
    }

    #[test]
    fn test_rule_names_unique() {
        let mut seen = std::collections::HashSet::new();
        for r in RULES {
            assert!(seen.insert(r.name), "duplicate rule {}", r.name);
        }
        assert_eq!(RULES.last().map(|r| r.name), Some("fallback"));
    }

    #[test]
    fn test_compound_beats_empty_and_stringify() {
        assert_eq!(rule(json!({"street": "A"}), "address"), "address");
        assert_eq!(rule(json!(null), "address"), "address");
        assert_eq!(fmt(json!(null), "address"), "No address provided");
        assert_eq!(fmt(json!({}), "address"), "No address provided");
    }

    #[test]
    fn test_booleans() {
        assert_eq!(fmt(json!(true), "isActive"), "Active");
        assert_eq!(fmt(json!(false), "isActive"), "Inactive");
        assert_eq!(fmt(json!(true), "hasWheelchair"), "Yes");
        assert_eq!(fmt(json!(false), "hasWheelchair"), "No");
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(fmt(json!(null), "email"), "No email address");
        assert_eq!(fmt(json!(""), "phone"), "No phone number");
        assert_eq!(fmt(json!(null), "favouriteColour"), "Not provided");
    }

    #[test]
    fn test_status_enums() {
        assert_eq!(fmt(json!("ACTIVE"), "status"), "Active");
        assert_eq!(fmt(json!("ON_HOLD"), "status"), "on hold");
        assert_eq!(fmt(json!("ON_HOLD"), "applicationStatus"), "on hold");
    }

    #[test]
    fn test_dates_need_name_and_parseable_value() {
        assert_eq!(fmt(json!("2024-01-05T09:30:00Z"), "dbsExpiry"), "05 Jan 2024");
        assert_eq!(fmt(json!("2024-01-05"), "startDate"), "05 Jan 2024");
        // Parseable but not a date field: shown raw.
        assert_eq!(fmt(json!("2024-01-05"), "notes"), "2024-01-05");
        // Date field but unparseable: shown raw.
        assert_eq!(fmt(json!("next week"), "startDate"), "next week");
    }

    #[test]
    fn test_custom_date_format() {
        let maps = LookupMaps::new();
        let config = HistoryConfig {
            date_format: "%Y/%m/%d".into(),
            ..HistoryConfig::default()
        };
        assert_eq!(fmt_with(&maps, &config, json!("2024-01-05"), "startDate"), "2024/01/05");
    }

    #[test]
    fn test_references() {
        assert_eq!(fmt(json!("D1"), "permanentDriver"), "John Smith");
        assert_eq!(fmt(json!(ID), "vendor"), ID);
        assert_eq!(fmt(json!({"firstName": "Ann", "lastName": "Lee"}), "pa"), "Ann Lee");
        assert_eq!(fmt(json!(null), "permanentDriver"), "No driver assigned");
    }

    #[test]
    fn test_reference_unknown_policy() {
        let maps = LookupMaps::new();
        let config = HistoryConfig {
            unresolved_reference: UnresolvedReference::Unknown,
            ..HistoryConfig::default()
        };
        assert_eq!(fmt_with(&maps, &config, json!(ID), "vendor"), "Unknown");
    }

    #[test]
    fn test_generic_arrays() {
        assert_eq!(fmt(json!([]), "tags"), "None");
        assert_eq!(fmt(json!(["a", "b"]), "tags"), "a, b");
        assert_eq!(
            fmt(json!([{"name": "North"}, {"id": "z2"}, 3]), "zones"),
            "North, z2, 3"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(fmt(json!("plain"), "nickname"), "plain");
        assert_eq!(fmt(json!(42), "yearGroup"), "42");
        assert_eq!(fmt(json!({"k": 1}), "misc"), r#"{"k":1}"#);
    }

    #[test]
    fn test_assignment_price_side() {
        let config = HistoryConfig::default();
        let maps = LookupMaps::new();
        let f = ValueFormatter::new(EntityType::Route, maps.context(&config));
        assert_eq!(f.format_price(&ChangeValue::from_json(&json!(50)), "driverPrice"), "£50");
        assert_eq!(f.format_price(&ChangeValue::from_json(&json!(null)), "driverPrice"), "Not provided");
        assert_eq!(f.format_price(&ChangeValue::from_json(&json!("  ")), "driverPrice"), "Not provided");
        assert_eq!(f.format_price(&ChangeValue::from_json(&json!("TBC")), "driverPrice"), "TBC");
    }

    #[test]
    fn test_price_fields() {
        assert_eq!(fmt(json!(50), "driverPrice"), "£50");
        assert_eq!(fmt(json!("45.5"), "paPrice"), "£45.50");
        assert_eq!(fmt(json!(null), "paPrice"), "No price set");
    }

    #[test]
    fn test_email_address_is_not_postal() {
        assert_eq!(fmt(json!(null), "emailAddress"), "No email address");
        assert_eq!(fmt(json!("a@x.com"), "emailAddress"), "a@x.com");
    }
}
