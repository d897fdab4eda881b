//! # Change Correlator — Merging Split Edits
//!
//! Assigning a driver or PA to a route is one user action, but the audit log
//! records it as two field changes: the assignment and its price. The
//! correlator finds such pairs by field name and timestamp proximity and
//! merges each into a single [`CombinedChangeRecord`].
//!
//! ## Invariants
//!
//! - Each source record is consumed at most once.
//! - A record without a partner passes through unchanged.
//! - Output preserves input order; a combined record takes the position of
//!   the earlier of its two sources.
//! - Records without a parseable `updatedAt` never correlate.
//! - The tolerance is exclusive: a gap equal to it does not combine.

use serde::Serialize;

use routewise_core::{millis_apart, ChangeRecord, ChangeValue, EditTime, EntityType, FieldPath, Timestamp};

use crate::config::HistoryConfig;

// ─── Types ───────────────────────────────────────────────────────────

/// What a combined record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinedKind {
    /// Permanent driver together with the driver price.
    DriverAssignment,
    /// Passenger assistant together with the PA price.
    PersonalAssistantAssignment,
}

impl CombinedKind {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DriverAssignment => "driver-assignment",
            Self::PersonalAssistantAssignment => "personal-assistant-assignment",
        }
    }
}

impl std::fmt::Display for CombinedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two correlated records merged into one logical edit. Both slots are
/// always present; a side that was not recorded is `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedChangeRecord {
    /// Which pairing produced this record.
    pub kind: CombinedKind,
    /// Field of the identity/reference side, e.g. `permanentDriver`.
    pub primary_field: FieldPath,
    /// Field of the associated scalar, e.g. `driverPrice`.
    pub secondary_field: FieldPath,
    /// Reference before the edit.
    pub primary_before: ChangeValue,
    /// Reference after the edit.
    pub primary_after: ChangeValue,
    /// Price before the edit.
    pub secondary_before: ChangeValue,
    /// Price after the edit.
    pub secondary_after: ChangeValue,
    /// The later of the two source timestamps.
    pub updated_at: Option<EditTime>,
}

/// A record as it flows through filtering and presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryItem {
    /// A source record, untouched.
    Single(ChangeRecord),
    /// Two source records merged.
    Combined(CombinedChangeRecord),
}

impl HistoryItem {
    /// Field path; the primary field for combined records.
    pub fn field(&self) -> &str {
        match self {
            Self::Single(r) => r.field.as_str(),
            Self::Combined(c) => c.primary_field.as_str(),
        }
    }

    /// Time used for ordering and proximity checks.
    pub fn effective_time(&self) -> Option<&EditTime> {
        match self {
            Self::Single(r) => r.effective_time(),
            Self::Combined(c) => c.updated_at.as_ref(),
        }
    }

    /// Parsed instant of [`effective_time`](Self::effective_time).
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.effective_time().and_then(EditTime::timestamp)
    }
}

impl From<ChangeRecord> for HistoryItem {
    fn from(record: ChangeRecord) -> Self {
        Self::Single(record)
    }
}

// ─── Counterparts ────────────────────────────────────────────────────

struct Counterpart {
    primary: &'static str,
    secondary: &'static str,
    kind: CombinedKind,
}

const COUNTERPARTS: &[Counterpart] = &[
    Counterpart {
        primary: "permanentDriver",
        secondary: "driverPrice",
        kind: CombinedKind::DriverAssignment,
    },
    Counterpart {
        primary: "pa",
        secondary: "paPrice",
        kind: CombinedKind::PersonalAssistantAssignment,
    },
];

/// The pairing `field` takes part in, and whether it is the primary side.
fn counterpart_of(field: &str) -> Option<(&'static Counterpart, bool)> {
    COUNTERPARTS.iter().find_map(|c| {
        if c.primary == field {
            Some((c, true))
        } else if c.secondary == field {
            Some((c, false))
        } else {
            None
        }
    })
}

// ─── Correlator ──────────────────────────────────────────────────────

/// Pairs assignment and price records that were logged as one edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeCorrelator {
    tolerance_ms: i64,
}

impl ChangeCorrelator {
    /// Correlator with an explicit tolerance in milliseconds.
    pub fn new(tolerance_ms: i64) -> Self {
        Self { tolerance_ms }
    }

    /// Correlator using the configured tolerance.
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.correlation_tolerance_ms)
    }

    fn within_tolerance(&self, a: &ChangeRecord, b: &ChangeRecord) -> bool {
        millis_apart(a.updated_at.as_ref(), b.updated_at.as_ref())
            .is_some_and(|gap| gap < self.tolerance_ms)
    }

    /// Merge correlated pairs. Always applies the counterpart rules,
    /// regardless of entity type; see [`correlate`] for the entity-aware
    /// entry point.
    pub fn correlate(&self, records: &[ChangeRecord]) -> Vec<HistoryItem> {
        let mut consumed = vec![false; records.len()];
        let mut out = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            consumed[i] = true;

            let Some((pair, is_primary)) = counterpart_of(record.field.as_str()) else {
                out.push(HistoryItem::Single(record.clone()));
                continue;
            };
            let wanted = if is_primary { pair.secondary } else { pair.primary };

            let partner = (i + 1..records.len()).find(|&j| {
                !consumed[j]
                    && records[j].field.as_str() == wanted
                    && self.within_tolerance(record, &records[j])
            });

            match partner {
                Some(j) => {
                    consumed[j] = true;
                    let (primary, secondary) = if is_primary {
                        (record, &records[j])
                    } else {
                        (&records[j], record)
                    };
                    tracing::debug!(
                        kind = %pair.kind,
                        first = i,
                        second = j,
                        "correlated assignment and price records"
                    );
                    out.push(HistoryItem::Combined(combine(pair.kind, primary, secondary)));
                }
                None => out.push(HistoryItem::Single(record.clone())),
            }
        }
        out
    }
}

fn combine(kind: CombinedKind, primary: &ChangeRecord, secondary: &ChangeRecord) -> CombinedChangeRecord {
    let later = match (primary.updated_at.as_ref(), secondary.updated_at.as_ref()) {
        (Some(a), Some(b)) => match (a.timestamp(), b.timestamp()) {
            (Some(ta), Some(tb)) => Some(EditTime::Parsed(ta.max(tb))),
            _ => Some(a.clone()),
        },
        (a, b) => a.or(b).cloned(),
    };
    CombinedChangeRecord {
        kind,
        primary_field: primary.field.clone(),
        secondary_field: secondary.field.clone(),
        primary_before: primary.old_value.clone(),
        primary_after: primary.new_value.clone(),
        secondary_before: secondary.old_value.clone(),
        secondary_after: secondary.new_value.clone(),
        updated_at: later,
    }
}

/// Entity-aware correlation: only routes record split assignments, every
/// other entity type passes its records through as singles.
pub fn correlate(records: &[ChangeRecord], entity: EntityType, config: &HistoryConfig) -> Vec<HistoryItem> {
    match entity {
        EntityType::Route => ChangeCorrelator::from_config(config).correlate(records),
        EntityType::Driver | EntityType::School | EntityType::PersonalAssistant | EntityType::Student => {
            records.iter().cloned().map(HistoryItem::Single).collect()
        }
    }
}
