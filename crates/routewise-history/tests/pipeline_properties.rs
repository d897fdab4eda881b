//! # Pipeline Properties
//!
//! Property tests over generated audit-log payloads: determinism, no-op
//! filtering and the correlation window.

use proptest::prelude::*;
use routewise_core::{ingest, EntityType};
use routewise_history::{
    summarize, summarize_json, ChangeCorrelator, HistoryConfig, HistoryItem, LookupMaps,
};
use serde_json::{json, Value};

/// 2024-01-01T10:00:00Z in epoch milliseconds.
const BASE_MS: i64 = 1_704_103_200_000;

const FIELDS: &[&str] = &[
    "email",
    "phone",
    "isActive",
    "status",
    "address",
    "permanentDriver",
    "driverPrice",
    "pa",
    "paPrice",
    "vendor",
    "parents",
    "startDate",
    "trainings.new",
    "Stop Added",
    "Stop Sequence Updated",
    "specialService",
];

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (0i64..500).prop_map(|n| json!(n)),
        "[a-zA-Z_ ]{0,12}".prop_map(Value::String),
        Just(json!("D1")),
        Just(json!("65a1f0c2e4b0a1b2c3d4e5f6")),
        Just(json!("2024-03-05")),
    ]
}

fn change_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn record() -> impl Strategy<Value = Value> {
    (
        prop::sample::select(FIELDS),
        change_value(),
        change_value(),
        prop::option::of(0i64..20_000),
    )
        .prop_map(|(field, old, new, offset)| {
            let mut r = json!({"field": field, "oldValue": old, "newValue": new});
            if let Some(offset) = offset {
                r["updatedAt"] = json!(BASE_MS + offset);
            }
            r
        })
}

fn entity() -> impl Strategy<Value = EntityType> {
    prop::sample::select(EntityType::all().to_vec())
}

fn pair(first: &str, second: &str, gap_ms: i64) -> Value {
    json!([
        {"field": first, "oldValue": "D1", "newValue": "D2", "updatedAt": BASE_MS},
        {"field": second, "oldValue": 10, "newValue": 20, "updatedAt": BASE_MS + gap_ms}
    ])
}

fn combined_count(payload: &Value) -> usize {
    let records = ingest(payload).unwrap();
    ChangeCorrelator::new(5_000)
        .correlate(&records)
        .iter()
        .filter(|item| matches!(item, HistoryItem::Combined(_)))
        .count()
}

proptest! {
    /// Two runs over the same input and maps give identical output.
    #[test]
    fn summarize_is_idempotent(
        records in prop::collection::vec(record(), 0..12),
        entity in entity(),
    ) {
        let maps = LookupMaps::new().with_name("D1", "John Smith");
        let config = HistoryConfig::default();
        let payload = Value::Array(records);
        let first = summarize_json(&payload, entity, maps.context(&config)).unwrap();
        let second = summarize_json(&payload, entity, maps.context(&config)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Outside routes, a record whose old and new values are identical
    /// never reaches the output.
    #[test]
    fn identical_values_are_filtered(
        field in prop::sample::select(FIELDS),
        value in change_value(),
    ) {
        let maps = LookupMaps::new();
        let config = HistoryConfig::default();
        let records = ingest(&json!([{"field": field, "oldValue": value, "newValue": value}])).unwrap();
        let entries = summarize(&records, EntityType::Student, maps.context(&config));
        prop_assert!(entries.is_empty(), "{field} kept: {entries:?}");
    }

    /// Inside the window the pair combines whichever side comes first.
    #[test]
    fn correlation_is_order_independent(gap in 0i64..5_000) {
        prop_assert_eq!(combined_count(&pair("permanentDriver", "driverPrice", gap)), 1);
        prop_assert_eq!(combined_count(&pair("driverPrice", "permanentDriver", gap)), 1);
    }

    /// At or beyond the window the pair never combines.
    #[test]
    fn correlation_window_is_exclusive(gap in 5_000i64..60_000) {
        prop_assert_eq!(combined_count(&pair("permanentDriver", "driverPrice", gap)), 0);
        prop_assert_eq!(combined_count(&pair("pa", "paPrice", gap)), 0);
    }
}

#[test]
fn tolerance_boundary_examples() {
    assert_eq!(combined_count(&pair("permanentDriver", "driverPrice", 3_000)), 1);
    assert_eq!(combined_count(&pair("permanentDriver", "driverPrice", 4_999)), 1);
    assert_eq!(combined_count(&pair("permanentDriver", "driverPrice", 5_001)), 0);
}
