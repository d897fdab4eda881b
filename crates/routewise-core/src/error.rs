//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout Routewise. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - The history pipeline itself is infallible. Errors only arise at the
//!   ingestion boundary, where a caller hands over something that is not a
//!   list of change records, and when loading configuration.
//! - Per-record failures carry the index of the offending record so the
//!   caller can locate it in the audit-log payload.

use thiserror::Error;

/// Top-level error type for Routewise.
#[derive(Error, Debug)]
pub enum RoutewiseError {
    /// The history payload was not a JSON array.
    #[error("change history must be an array, got {found}")]
    NotAnArray {
        /// JSON type name of the value actually supplied.
        found: &'static str,
    },

    /// A single record in the payload was malformed.
    #[error("invalid change record: {0}")]
    Record(#[from] RecordError),

    /// Unknown entity type selector.
    #[error("unknown entity type: {0:?}")]
    UnknownEntityType(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error describing why one record of the payload was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record itself is not a JSON object.
    #[error("record {index} is not an object")]
    NotAnObject {
        /// Position of the record in the payload.
        index: usize,
    },

    /// The record has no usable `field` path.
    #[error("record {index} has a missing or blank field path")]
    MissingField {
        /// Position of the record in the payload.
        index: usize,
    },
}

/// Error constructing a [`FieldPath`](crate::record::FieldPath).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field path must not be blank")]
pub struct EmptyFieldPath;
