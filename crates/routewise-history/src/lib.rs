#![deny(missing_docs)]

//! # routewise-history — Change-History Summarization
//!
//! Turns the raw "field changed" records of the audit log into the edit
//! history an operator reads in the admin console.
//!
//! ## Pipeline
//!
//! ```text
//! records ─▶ ChangeCorrelator ─▶ ChangeFilter ─▶ HistoryPresenter ─▶ entries
//!                                     │                 │
//!                               ValueFormatter   FieldDictionary
//!                                     │
//!                             ReferenceResolver
//! ```
//!
//! - **Correlation** merges an assignment and its price, logged as two
//!   records, into one combined item.
//! - **Filtering** drops housekeeping events, derived stop resequencing and
//!   edits whose before/after text is identical.
//! - **Presentation** orders items and attaches a label, before/after text
//!   and a rendering kind.
//!
//! All field-name heuristics live in [`category`]. Every stage is a pure
//! function of the records, the [`LookupMaps`] and the [`HistoryConfig`].

pub mod category;
pub mod config;
pub mod context;
pub mod correlate;
pub mod dictionary;
pub mod filter;
pub mod format;
pub mod pipeline;
pub mod present;
pub mod resolver;
pub mod text;

// Re-export primary types.
pub use category::{classify, CompoundCategory, FieldProfile, StructuralCategory};
pub use config::{HistoryConfig, UnresolvedReference};
pub use context::{HistoryContext, LookupMaps, NameMap};
pub use correlate::{ChangeCorrelator, CombinedChangeRecord, CombinedKind, HistoryItem};
pub use dictionary::FieldDictionary;
pub use filter::{ChangeFilter, DropReason, KeepReason, Verdict};
pub use format::ValueFormatter;
pub use pipeline::{summarize, summarize_json};
pub use present::{EntryKind, HistoryPresenter, MembershipChange, PresentationEntry};
pub use resolver::ReferenceResolver;
