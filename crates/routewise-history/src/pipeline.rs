//! # Pipeline — Records In, Entries Out
//!
//! `correlate → filter → present`, as one pure function over the caller's
//! records and lookup maps. Nothing is cached between calls, so running it
//! twice on the same input gives the same output.

use serde_json::Value;

use routewise_core::{ingest, ChangeRecord, EntityType, RoutewiseError};

use crate::context::HistoryContext;
use crate::correlate::correlate;
use crate::filter::ChangeFilter;
use crate::present::{HistoryPresenter, PresentationEntry};

/// Summarise typed records for display.
pub fn summarize(
    records: &[ChangeRecord],
    entity: EntityType,
    ctx: HistoryContext<'_>,
) -> Vec<PresentationEntry> {
    let items = correlate(records, entity, ctx.config);
    let kept = ChangeFilter::new(entity, ctx).apply(&items);
    let entries = HistoryPresenter::new(entity, ctx).present(&kept);
    tracing::debug!(
        entity = %entity,
        records = records.len(),
        items = items.len(),
        kept = kept.len(),
        "summarized change history"
    );
    entries
}

/// Ingest a raw audit-log payload and summarise it. Fails only when the
/// payload is not an array of well-formed records.
pub fn summarize_json(
    payload: &Value,
    entity: EntityType,
    ctx: HistoryContext<'_>,
) -> Result<Vec<PresentationEntry>, RoutewiseError> {
    let records = ingest(payload)?;
    Ok(summarize(&records, entity, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::context::LookupMaps;
    use serde_json::json;

    #[test]
    fn test_summarize_json_rejects_non_array() {
        let maps = LookupMaps::new();
        let config = HistoryConfig::default();
        let err = summarize_json(&json!({"field": "email"}), EntityType::Driver, maps.context(&config))
            .unwrap_err();
        assert!(matches!(err, RoutewiseError::NotAnArray { .. }));
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let maps = LookupMaps::new();
        let config = HistoryConfig::default();
        let entries = summarize_json(&json!([]), EntityType::Route, maps.context(&config)).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unchanged_records_vanish() {
        let maps = LookupMaps::new();
        let config = HistoryConfig::default();
        let payload = json!([
            {"field": "email", "oldValue": "a@x", "newValue": "a@x", "updatedAt": "2024-01-01T10:00:00Z"},
            {"field": "email", "oldValue": "a@x", "newValue": "b@x", "updatedAt": "2024-01-02T10:00:00Z"}
        ]);
        let entries = summarize_json(&payload, EntityType::School, maps.context(&config)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].after.as_deref(), Some("b@x"));
    }
}
