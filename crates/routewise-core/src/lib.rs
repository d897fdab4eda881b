#![deny(missing_docs)]

//! # routewise-core — Foundational Types for Change-History Rendering
//!
//! This crate defines the types every other Routewise crate depends on. It
//! has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, `chrono`, `uuid` and `tracing` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Validate at the boundary.** [`ingest`] is the only way untyped audit
//!    JSON becomes [`ChangeRecord`]s. Non-array input is rejected; a record
//!    without a field path is rejected. Downstream code never re-checks.
//!
//! 2. **Classify payloads once.** Every old/new value is turned into a
//!    [`ChangeValue`] variant at ingestion, so formatters match on tags
//!    instead of sniffing JSON shapes.
//!
//! 3. **Single [`EntityType`] enum.** Exhaustive `match` everywhere a rule
//!    depends on the owning entity.
//!
//! 4. **[`RoutewiseError`] hierarchy.** Structured errors with `thiserror`,
//!    no `.unwrap()` outside tests.

pub mod entity;
pub mod error;
pub mod identity;
pub mod record;
pub mod temporal;
pub mod value;

// Re-export primary types at crate root for ergonomic imports.
pub use entity::EntityType;
pub use error::{EmptyFieldPath, RecordError, RoutewiseError};
pub use identity::{is_embedded_identifier, ObjectId};
pub use record::{ingest, ChangeRecord, FieldPath};
pub use temporal::{millis_apart, parse_date_like, EditTime, Timestamp};
pub use value::ChangeValue;
