//! # Change Records — Ingestion Boundary
//!
//! A [`ChangeRecord`] is one field-level edit from the external audit log.
//! [`ingest`] is the single place where untyped JSON becomes typed records:
//! it rejects non-array input outright and rejects records without a usable
//! field path. Everything past this point can rely on those invariants.
//!
//! Keys other than the well-known ones ride along in
//! [`ChangeRecord::extras`] so special-case formatters can reach auxiliary
//! data (an associated student, a school name) without the generic pipeline
//! interpreting it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EmptyFieldPath, RecordError, RoutewiseError};
use crate::temporal::{EditTime, Timestamp};
use crate::value::{json_type_name, ChangeValue};

/// Keys consumed by ingestion; anything else lands in `extras`.
const KNOWN_KEYS: &[&str] = &["field", "oldValue", "newValue", "updatedAt", "createdAt"];

// ─── FieldPath ───────────────────────────────────────────────────────

/// A dotted path naming the changed attribute. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    /// Validate and wrap a field path.
    pub fn new(path: impl Into<String>) -> Result<Self, EmptyFieldPath> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(EmptyFieldPath);
        }
        Ok(Self(path))
    }

    /// The path text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// First segment, i.e. the top-level attribute.
    pub fn root(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Last segment, i.e. the leaf attribute.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = EmptyFieldPath;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── ChangeRecord ────────────────────────────────────────────────────

/// One logged field-level edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    /// The changed attribute.
    pub field: FieldPath,
    /// Value before the edit; `Absent` for an addition.
    pub old_value: ChangeValue,
    /// Value after the edit; `Absent` for a removal.
    pub new_value: ChangeValue,
    /// When the edit was logged.
    pub updated_at: Option<EditTime>,
    /// Creation time, used when `updated_at` is missing.
    pub created_at: Option<EditTime>,
    /// Auxiliary caller-supplied keys.
    pub extras: BTreeMap<String, ChangeValue>,
}

impl ChangeRecord {
    /// Build a record directly; mostly useful in tests and for callers that
    /// already hold typed data.
    pub fn new(
        field: FieldPath,
        old_value: ChangeValue,
        new_value: ChangeValue,
        updated_at: Option<EditTime>,
    ) -> Self {
        Self {
            field,
            old_value,
            new_value,
            updated_at,
            created_at: None,
            extras: BTreeMap::new(),
        }
    }

    /// Parse one record object. `index` is only used for error reporting.
    pub fn from_json(index: usize, value: &Value) -> Result<Self, RecordError> {
        let obj = value.as_object().ok_or(RecordError::NotAnObject { index })?;

        let field = obj
            .get("field")
            .and_then(Value::as_str)
            .and_then(|s| FieldPath::new(s).ok())
            .ok_or(RecordError::MissingField { index })?;

        let value_of = |key: &str| obj.get(key).map(ChangeValue::from_json).unwrap_or_default();
        let time_of = |key: &str| obj.get(key).and_then(EditTime::from_json);

        let updated_at = time_of("updatedAt");
        if let Some(EditTime::Unparsed(raw)) = &updated_at {
            tracing::warn!(index, field = %field, raw = %raw, "unparseable updatedAt; record will sort as oldest");
        }

        let extras = obj
            .iter()
            .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), ChangeValue::from_json(v)))
            .collect();

        Ok(Self {
            field,
            old_value: value_of("oldValue"),
            new_value: value_of("newValue"),
            updated_at,
            created_at: time_of("createdAt"),
            extras,
        })
    }

    /// The edit time used for ordering: the first of `updatedAt`,
    /// `createdAt` that parses, else whichever raw text is present.
    pub fn effective_time(&self) -> Option<&EditTime> {
        let parsed = |t: &&EditTime| t.timestamp().is_some();
        self.updated_at
            .as_ref()
            .filter(parsed)
            .or_else(|| self.created_at.as_ref().filter(parsed))
            .or(self.updated_at.as_ref())
            .or(self.created_at.as_ref())
    }

    /// Parsed instant of [`effective_time`](Self::effective_time).
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.effective_time().and_then(EditTime::timestamp)
    }

    /// An auxiliary key supplied alongside the record.
    pub fn extra(&self, key: &str) -> Option<&ChangeValue> {
        self.extras.get(key).filter(|v| v.is_present())
    }
}

/// Ingest an audit-log payload.
///
/// # Errors
///
/// - [`RoutewiseError::NotAnArray`] if `payload` is not a JSON array.
/// - [`RoutewiseError::Record`] for the first element that is not an object
///   or has a missing/blank `field`.
pub fn ingest(payload: &Value) -> Result<Vec<ChangeRecord>, RoutewiseError> {
    let items = payload.as_array().ok_or(RoutewiseError::NotAnArray {
        found: json_type_name(payload),
    })?;
    let records = items
        .iter()
        .enumerate()
        .map(|(i, item)| ChangeRecord::from_json(i, item))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = records.len(), "ingested change records");
    Ok(records)
}
