//! # Change Filter — Is This Edit Worth Showing?
//!
//! Decides, per item, whether it represents a real, displayable change. The
//! filter never mutates an item; it only returns a [`Verdict`].
//!
//! Rules, first decisive one wins:
//!
//! 1. Driver history: anything about temporary assignments is dropped.
//! 2. File-pipeline bookkeeping (`trainings.fileUpload` etc.) is dropped.
//! 3. "Stop Sequence Updated" is dropped when a "Stop Added"/"Stop Removed"
//!    item lies within the stop-sequence window: it is the automatic
//!    side-effect of that explicit edit.
//! 4. Route structural items (special services, stops, day-wise students)
//!    are kept: adding or removing them matters even if the text matches.
//! 5. Combined items are kept if the assignee or the price text changed.
//! 6. `parents` compares the raw arrays structurally, since two different
//!    parent lists can summarise to the same text.
//! 7. Everything else is kept only if old and new format differently.

use routewise_core::{millis_apart, EntityType};

use crate::category::{classify, FieldProfile};
use crate::context::HistoryContext;
use crate::correlate::HistoryItem;
use crate::format::ValueFormatter;

/// Why an item is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// Route structural record.
    Structural,
    /// Assignee or price text differs.
    AssignmentChanged,
    /// Parent list differs structurally.
    ParentsChanged,
    /// Formatted old and new values differ.
    ValueChanged,
}

/// Why an item is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Temporary assignment in driver history.
    TemporaryAssignment,
    /// Internal file-pipeline event.
    Bookkeeping,
    /// Resequencing caused by a nearby stop edit.
    DerivedStopSequence,
    /// Nothing visible changed.
    Unchanged,
}

/// Filter outcome for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Show the item.
    Keep(KeepReason),
    /// Hide the item.
    Drop(DropReason),
}

impl Verdict {
    /// Whether the item is shown.
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }
}

/// Applies the display rules for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct ChangeFilter<'a> {
    entity: EntityType,
    formatter: ValueFormatter<'a>,
    stop_window_ms: i64,
}

impl<'a> ChangeFilter<'a> {
    /// Filter for `entity` over `ctx`.
    pub fn new(entity: EntityType, ctx: HistoryContext<'a>) -> Self {
        Self {
            entity,
            formatter: ValueFormatter::new(entity, ctx),
            stop_window_ms: ctx.config.stop_sequence_window_ms,
        }
    }

    fn is_derived_stop_sequence(&self, item: &HistoryItem, all: &[HistoryItem]) -> bool {
        all.iter().any(|other| {
            classify(other.field()).is_stop_membership
                && millis_apart(other.effective_time(), item.effective_time())
                    .is_some_and(|gap| gap < self.stop_window_ms)
        })
    }

    /// Decide whether `item`, seen among `all`, is displayed.
    pub fn decide(&self, item: &HistoryItem, all: &[HistoryItem]) -> Verdict {
        let profile: FieldProfile = classify(item.field());

        if self.entity == EntityType::Driver && profile.is_temporary {
            return Verdict::Drop(DropReason::TemporaryAssignment);
        }
        if profile.is_bookkeeping {
            return Verdict::Drop(DropReason::Bookkeeping);
        }
        if profile.is_stop_sequence && self.is_derived_stop_sequence(item, all) {
            return Verdict::Drop(DropReason::DerivedStopSequence);
        }
        if self.entity == EntityType::Route && profile.structural.is_some() {
            return Verdict::Keep(KeepReason::Structural);
        }

        match item {
            HistoryItem::Combined(c) => {
                let f = &self.formatter;
                let assignee_changed = f.format_assignee(&c.primary_before) != f.format_assignee(&c.primary_after);
                let price_field = c.secondary_field.as_str();
                let price_changed = f.format_price(&c.secondary_before, price_field)
                    != f.format_price(&c.secondary_after, price_field);
                if assignee_changed || price_changed {
                    Verdict::Keep(KeepReason::AssignmentChanged)
                } else {
                    Verdict::Drop(DropReason::Unchanged)
                }
            }
            HistoryItem::Single(r) if r.field.as_str() == "parents" => {
                if r.old_value != r.new_value {
                    Verdict::Keep(KeepReason::ParentsChanged)
                } else {
                    Verdict::Drop(DropReason::Unchanged)
                }
            }
            HistoryItem::Single(r) => {
                let field = r.field.as_str();
                let before = self.formatter.format(&r.old_value, field);
                let after = self.formatter.format(&r.new_value, field);
                if before != after {
                    Verdict::Keep(KeepReason::ValueChanged)
                } else {
                    Verdict::Drop(DropReason::Unchanged)
                }
            }
        }
    }

    /// Whether `item` is displayed.
    pub fn is_displayable(&self, item: &HistoryItem, all: &[HistoryItem]) -> bool {
        self.decide(item, all).is_keep()
    }

    /// Keep the displayable items, in order.
    pub fn apply(&self, items: &[HistoryItem]) -> Vec<HistoryItem> {
        items
            .iter()
            .filter(|item| match self.decide(item, items) {
                Verdict::Keep(_) => true,
                Verdict::Drop(reason) => {
                    tracing::debug!(field = item.field(), ?reason, "dropped change record");
                    false
                }
            })
            .cloned()
            .collect()
    }
}

/// One-shot decision for a single item.
pub fn is_displayable(
    item: &HistoryItem,
    all: &[HistoryItem],
    entity: EntityType,
    ctx: HistoryContext<'_>,
) -> bool {
    ChangeFilter::new(entity, ctx).is_displayable(item, all)
}
