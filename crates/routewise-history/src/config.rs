//! # History Configuration
//!
//! Tunables for a pipeline run. Every field has a default, so an empty YAML
//! document (or `HistoryConfig::default()`) yields the standard behaviour.
//!
//! ```yaml
//! correlation_tolerance_ms: 5000
//! stop_sequence_window_ms: 2000
//! unresolved_reference: raw_id   # or: unknown
//! currency_symbol: "£"
//! date_format: "%d %b %Y"
//! ```

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use routewise_core::RoutewiseError;

/// Default window within which an assignment and its price are one edit.
pub const DEFAULT_CORRELATION_TOLERANCE_MS: i64 = 5_000;

/// Default window within which a stop-sequence record is derived noise.
pub const DEFAULT_STOP_SEQUENCE_WINDOW_MS: i64 = 2_000;

/// What to show for an identifier that has no name mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReference {
    /// Show the raw identifier.
    #[default]
    RawId,
    /// Show the literal "Unknown".
    Unknown,
}

/// Pipeline configuration. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum gap (exclusive) between two records merged into one edit.
    pub correlation_tolerance_ms: i64,
    /// Maximum gap (exclusive) between a stop addition/removal and the
    /// resequencing record it causes.
    pub stop_sequence_window_ms: i64,
    /// Fallback for unmapped identifiers.
    pub unresolved_reference: UnresolvedReference,
    /// Prefix for monetary amounts.
    pub currency_symbol: String,
    /// `chrono` format string for rendered dates.
    pub date_format: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            correlation_tolerance_ms: DEFAULT_CORRELATION_TOLERANCE_MS,
            stop_sequence_window_ms: DEFAULT_STOP_SEQUENCE_WINDOW_MS,
            unresolved_reference: UnresolvedReference::RawId,
            currency_symbol: "£".to_string(),
            date_format: "%d %b %Y".to_string(),
        }
    }
}

impl HistoryConfig {
    /// Parse a configuration from YAML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RoutewiseError::Config`] for malformed YAML, unknown enum
    /// values, negative windows or an invalid date format.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RoutewiseError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| RoutewiseError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RoutewiseError> {
        if self.correlation_tolerance_ms < 0 {
            return Err(RoutewiseError::Config(format!(
                "correlation_tolerance_ms must be non-negative, got {}",
                self.correlation_tolerance_ms
            )));
        }
        if self.stop_sequence_window_ms < 0 {
            return Err(RoutewiseError::Config(format!(
                "stop_sequence_window_ms must be non-negative, got {}",
                self.stop_sequence_window_ms
            )));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(RoutewiseError::Config(format!(
                "date_format is not a valid strftime pattern: {:?}",
                self.date_format
            )));
        }
        Ok(())
    }
}
